//! Mesh to block structure conversion.
//!
//! [`StructureBuilder`] runs a mesh or an external voxel volume through the
//! voxel pipeline and returns a [`Structure`], whose blocks are handed to a
//! [`BlockSink`] as [`BlockRecord`]s.

pub mod config;
pub mod emit;
pub mod pipeline;

pub use config::{ArmorType, BuildConfig, GridClass, ModelScale};
pub use emit::{BlockCatalog, BlockEmitter, BlockRecord, BlockSink};
pub use pipeline::{BuildReport, Structure, StructureBuilder};
