//! Error types for the pipeline.

use thiserror::Error;

/// Pipeline-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading an external voxel volume
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any processing started
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Grid would exceed the configured cell budget
    #[error("Grid of {cells} cells exceeds the limit of {limit} cells")]
    ResourceExhausted { cells: u64, limit: u64 },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
