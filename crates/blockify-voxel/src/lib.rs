//! Voxelization and shape classification for blockify.
//!
//! This crate turns geometry into a classified occupancy grid:
//! - [`Rasterizer`] marks the cells a triangle mesh passes through
//! - [`VoxelVolume`] decodes grids from an external voxelizer
//! - [`classify_exterior`] separates exterior air from enclosed void
//! - [`classify_shapes`] refines exterior cells into slopes and corners

pub mod exterior;
pub mod grid;
pub mod raster;
pub mod shapes;
pub mod volume;

pub use exterior::{classify_exterior, ExteriorStats};
pub use grid::{check_dims, Census, Grid};
pub use raster::{GridExtent, RasterStats, Rasterizer};
pub use shapes::{classify_shapes, ShapeStats};
pub use volume::{acquire_volume, VoxelSource, VoxelVolume, VoxelizeRequest};
