//! Test support for blockify.
//!
//! Provides the reference grids and meshes used across the workspace tests,
//! plus a text dump of grids for snapshot testing.

pub mod dump;
pub mod fixtures;

pub use dump::{dump_layers, state_char};
pub use fixtures::{
    box_mesh, corner_notch, grid_from_layers, hollow_shell, l_ramp, rotated_box, staggered_star,
    tray, uv_sphere,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("Bad fixture: {0}")]
    Fixture(String),
    #[error("Grid error: {0}")]
    Grid(#[from] blockify_core::Error),
}

pub type Result<T> = std::result::Result<T, TestError>;
