//! Core types, geometry, and errors for blockify.
//!
//! This crate provides the foundational types shared by every stage of the
//! mesh-to-blocks pipeline:
//! - Cell states and the closed set of shape orientations
//! - Grid coordinates, dimensions and axis directions
//! - Triangle and segment geometry used by the rasterizer
//! - The crate-wide error type

pub mod coords;
pub mod error;
pub mod math;
pub mod types;

pub use coords::{Axis, CellPos, Direction, GridDims, Sign};
pub use error::{Error, Result};
pub use math::{Aabb, Segment, Triangle};
pub use types::{CellState, Octant, Orientation, ShapeFamily, Slope};

/// Pipeline-wide constants
pub mod constants {
    /// Offset added to both endpoints of every rasterizer ray on all three
    /// axes. Mesh vertices snapped to integer coordinates would otherwise put
    /// rays exactly on shared triangle edges, where the intersection test is
    /// unreliable.
    pub const RAY_OFFSET: f64 = 0.000_004_56;
    /// Default upper bound on the number of cells a single grid may hold.
    pub const DEFAULT_MAX_CELLS: u64 = 1 << 27;
}
