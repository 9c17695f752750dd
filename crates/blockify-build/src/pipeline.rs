//! Structure building pipeline.
//!
//! A build runs the stages strictly in order on one owned grid:
//! rasterize (or ingest a volume), classify the exterior, optionally fill
//! enclosed voids, optionally refine shapes. The result is a [`Structure`]
//! that can emit its blocks any number of times.

use std::borrow::Cow;

use blockify_core::{Aabb, CellState, Error, GridDims, Result, Triangle};
use blockify_voxel::{
    acquire_volume, check_dims, classify_exterior, classify_shapes, Census, ExteriorStats,
    Grid, GridExtent, RasterStats, Rasterizer, ShapeStats, VoxelSource,
};
use glam::DVec3;

use crate::config::BuildConfig;
use crate::emit::{BlockCatalog, BlockEmitter, BlockRecord, BlockSink};

/// What happened during a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Grid dimensions
    pub dims: GridDims,
    /// Rasterizer counters, for mesh builds
    pub raster: Option<RasterStats>,
    pub exterior: ExteriorStats,
    /// Void cells turned solid by interior filling
    pub filled: usize,
    /// Shape pass counters, when smoothing ran
    pub shapes: Option<ShapeStats>,
    /// Final cell counts
    pub census: Census,
}

impl BuildReport {
    /// Number of blocks the structure emits.
    pub const fn blocks(&self) -> usize {
        self.census.blocks()
    }

    /// Exterior cells touching a solid face that no shape rule matched.
    pub fn unmatched_air(&self) -> usize {
        self.shapes.map_or(0, |s| s.unmatched)
    }
}

/// A finished, classified grid.
#[derive(Clone, Debug)]
pub struct Structure {
    grid: Grid,
    config: BuildConfig,
    report: BuildReport,
}

impl Structure {
    /// The classified grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Build statistics
    pub const fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Configuration the structure was built with
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Whether the structure should be placed as a static grid.
    pub const fn is_static(&self) -> bool {
        self.config.grid_class.is_static()
    }

    /// Size of the grid in meters.
    pub fn world_size(&self) -> DVec3 {
        self.grid.dims().to_uvec3().as_dvec3() * self.config.grid_class.cube_size()
    }

    fn emitter(&self) -> BlockEmitter {
        BlockEmitter::new(BlockCatalog::new(self.config.grid_class, self.config.armor))
    }

    /// Send every block to `sink`, returning how many were sent.
    pub fn emit<S: BlockSink + ?Sized>(&self, sink: &mut S) -> usize {
        self.emitter().emit(&self.grid, sink)
    }

    /// Collect every block.
    pub fn blocks(&self) -> Vec<BlockRecord> {
        self.emitter().records(&self.grid)
    }

    /// Take the grid out of the structure.
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Drives meshes and volumes through the pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructureBuilder {
    config: BuildConfig,
}

impl StructureBuilder {
    /// Create a builder with the given configuration.
    pub const fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build from a mesh, scaling it per the config and sizing the grid to
    /// its bounds.
    pub fn build_from_mesh(&self, triangles: &[Triangle]) -> Result<Structure> {
        let _span = tracing::trace_span!("build.mesh").entered();

        let bounds = Aabb::from_points(triangles.iter().flat_map(Triangle::vertices))
            .ok_or_else(|| Error::InvalidInput("mesh has no triangles".to_string()))?;
        let factor = self.config.scale.factor(&bounds)?;

        let triangles: Cow<'_, [Triangle]> = if (factor - 1.0).abs() > f64::EPSILON {
            tracing::debug!(factor, "scaling mesh");
            triangles.iter().map(|t| t.scaled(factor)).collect()
        } else {
            Cow::Borrowed(triangles)
        };
        let extent = GridExtent::for_triangles(&triangles)?;
        self.build_from_mesh_in(&triangles, extent)
    }

    /// Build from a mesh already in grid units, into an explicit extent.
    ///
    /// Surface outside the extent is dropped.
    pub fn build_from_mesh_in(
        &self,
        triangles: &[Triangle],
        extent: GridExtent,
    ) -> Result<Structure> {
        check_dims(extent.dims, self.config.max_cells)?;
        extent.validate()?;
        if triangles.is_empty() {
            return Err(Error::InvalidInput("mesh has no triangles".to_string()));
        }

        let (grid, raster) = Rasterizer::new(extent).rasterize(triangles, self.config.max_cells)?;
        Ok(self.finish(grid, Some(raster)))
    }

    /// Build from an external voxelizer.
    pub fn build_from_volume<S: VoxelSource + ?Sized>(&self, source: &mut S) -> Result<Structure> {
        let _span = tracing::trace_span!("build.volume").entered();

        let volume = acquire_volume(source, self.config.scale.resolution())?;
        check_dims(volume.dims(), self.config.max_cells)?;
        let grid = volume.into_grid(self.config.fill_interior)?;
        Ok(self.finish(grid, None))
    }

    /// Classify an occupancy grid produced elsewhere.
    ///
    /// Cells must be `Solid`, `Empty` or `Void`. `Empty` cells are resolved
    /// by the exterior fill like a rasterized grid; `Void` cells stay
    /// enclosed. Any already classified cell is rejected.
    pub fn build_from_grid(&self, grid: Grid) -> Result<Structure> {
        let _span = tracing::trace_span!("build.grid").entered();

        check_dims(grid.dims(), self.config.max_cells)?;
        let classified = grid.iter().find(|&(_, state)| {
            !matches!(state, CellState::Solid | CellState::Empty | CellState::Void)
        });
        if let Some((pos, state)) = classified {
            return Err(Error::InvalidInput(format!(
                "cell ({}, {}, {}) is already classified as {state:?}",
                pos.x, pos.y, pos.z
            )));
        }
        Ok(self.finish(grid, None))
    }

    fn finish(&self, mut grid: Grid, raster: Option<RasterStats>) -> Structure {
        let exterior = classify_exterior(&mut grid);
        let filled = if self.config.fill_interior {
            grid.replace_all(CellState::Void, CellState::Solid)
        } else {
            0
        };
        let shapes = self.config.smooth.then(|| classify_shapes(&mut grid));

        let report = BuildReport {
            dims: grid.dims(),
            raster,
            exterior,
            filled,
            shapes,
            census: grid.census(),
        };
        tracing::debug!(
            x = report.dims.x,
            y = report.dims.y,
            z = report.dims.z,
            blocks = report.blocks(),
            unmatched_air = report.unmatched_air(),
            "built structure"
        );

        Structure {
            grid,
            config: self.config,
            report,
        }
    }
}
