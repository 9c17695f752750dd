//! Triangle mesh to occupancy grid.
//!
//! Every triangle is probed with short axis-aligned segments along X, Y and
//! Z through each integer row of cells its bounding box overlaps. Each
//! segment is tested in both directions, so a surface is found regardless of
//! winding, and the cell containing every hit becomes `Solid`.

use blockify_core::constants::RAY_OFFSET;
use blockify_core::{Aabb, CellPos, CellState, Error, GridDims, Result, Segment, Triangle};
use glam::{DVec3, IVec3};

use crate::grid::Grid;

/// Hits this close to an integer plane are treated as lying on it.
const SNAP_EPSILON: f64 = 1e-9;

/// Integer placement of a grid in model space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridExtent {
    /// Model-space position of cell `(0, 0, 0)`'s minimum corner
    pub origin: IVec3,
    /// Cells per axis
    pub dims: GridDims,
}

impl GridExtent {
    /// Create a new extent
    #[inline]
    pub const fn new(origin: IVec3, dims: GridDims) -> Self {
        Self { origin, dims }
    }

    /// Create an extent, rejecting placements whose upper face lies outside
    /// the `i32` range.
    pub fn checked(origin: IVec3, dims: GridDims) -> Result<Self> {
        let extent = Self::new(origin, dims);
        extent.validate()?;
        Ok(extent)
    }

    /// Check that every cell boundary of the extent has an `i32` address.
    pub fn validate(&self) -> Result<()> {
        let upper = self.origin.as_i64vec3() + self.dims.to_uvec3().as_i64vec3();
        if upper.max_element() > i64::from(i32::MAX) {
            return Err(Error::InvalidInput(format!(
                "extent at {} with {}x{}x{} cells exceeds the integer grid range",
                self.origin, self.dims.x, self.dims.y, self.dims.z
            )));
        }
        Ok(())
    }

    /// Smallest integer extent enclosing `aabb`: `floor(min)` to `ceil(max)`,
    /// at least one cell thick on every axis.
    pub fn enclosing(aabb: &Aabb) -> Result<Self> {
        if !aabb.min.is_finite() || !aabb.max.is_finite() {
            return Err(Error::InvalidInput(
                "model bounds are not finite".to_string(),
            ));
        }
        let min = aabb.min.floor();
        let max = aabb.max.ceil().max(min + DVec3::ONE);
        let limit = f64::from(i32::MAX);
        if min.min_element() < f64::from(i32::MIN) || max.max_element() > limit {
            return Err(Error::InvalidInput(format!(
                "model bounds {min} .. {max} exceed the integer grid range"
            )));
        }
        let size = max - min;
        Self::checked(
            min.as_ivec3(),
            GridDims::new(size.x as u32, size.y as u32, size.z as u32),
        )
    }

    /// Extent enclosing every vertex of `triangles`.
    pub fn for_triangles(triangles: &[Triangle]) -> Result<Self> {
        let aabb = Aabb::from_points(triangles.iter().flat_map(Triangle::vertices))
            .ok_or_else(|| Error::InvalidInput("mesh has no triangles".to_string()))?;
        Self::enclosing(&aabb)
    }

    /// Model-space position one past the last cell on every axis.
    ///
    /// Saturates at `i32::MAX` for extents that fail [`GridExtent::validate`].
    #[inline]
    pub fn upper(&self) -> IVec3 {
        self.origin.saturating_add(self.dims.to_uvec3().as_ivec3())
    }

    /// The cell containing a model-space point.
    ///
    /// A point lying exactly on the extent's upper face belongs to the last
    /// cell on that axis; points outside the extent have no cell.
    pub fn cell_of(&self, point: DVec3) -> Option<CellPos> {
        let rounded = point.round();
        let snapped = DVec3::select(
            (point - rounded).abs().cmple(DVec3::splat(SNAP_EPSILON)),
            rounded,
            point,
        );
        let rel = snapped.floor() - self.origin.as_dvec3();
        let dims = self.dims.to_uvec3().as_dvec3();
        let mut cell = [0_u32; 3];
        for axis in 0..3 {
            let r = rel[axis];
            if !(0.0..=dims[axis]).contains(&r) {
                return None;
            }
            cell[axis] = if r == dims[axis] {
                r as u32 - 1
            } else {
                r as u32
            };
        }
        Some(CellPos::new(cell[0], cell[1], cell[2]))
    }
}

/// Counters reported by [`Rasterizer::rasterize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Triangles processed
    pub triangles: usize,
    /// Zero-area triangles skipped
    pub degenerate: usize,
    /// Segments tested (each in both directions)
    pub segments: usize,
    /// Intersections found
    pub hits: usize,
    /// Intersections that fell outside the extent
    pub dropped: usize,
}

/// Marks the cells crossed by a triangle surface.
#[derive(Clone, Copy, Debug)]
pub struct Rasterizer {
    extent: GridExtent,
    offset: f64,
}

impl Rasterizer {
    /// Create a rasterizer for a fixed extent
    pub const fn new(extent: GridExtent) -> Self {
        Self {
            extent,
            offset: RAY_OFFSET,
        }
    }

    #[cfg(test)]
    #[must_use]
    fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Rasterize `triangles` into a fresh grid sized to the extent.
    ///
    /// Only cells crossed by the surface are set; everything else stays
    /// `Empty` for the exterior pass to resolve.
    pub fn rasterize(
        &self,
        triangles: &[Triangle],
        max_cells: u64,
    ) -> Result<(Grid, RasterStats)> {
        let _span = tracing::trace_span!("voxel.rasterize").entered();

        self.extent.validate()?;
        let mut grid = Grid::with_limit(self.extent.dims, max_cells)?;
        let mut stats = RasterStats::default();
        for triangle in triangles {
            stats.triangles += 1;
            if triangle.is_degenerate() {
                stats.degenerate += 1;
                continue;
            }
            self.rasterize_triangle(triangle, &mut grid, &mut stats);
        }

        tracing::debug!(
            triangles = stats.triangles,
            degenerate = stats.degenerate,
            segments = stats.segments,
            hits = stats.hits,
            dropped = stats.dropped,
            "rasterized mesh"
        );
        Ok((grid, stats))
    }

    fn rasterize_triangle(&self, triangle: &Triangle, grid: &mut Grid, stats: &mut RasterStats) {
        let bounds = triangle.aabb();
        let origin = self.extent.origin.as_dvec3();
        let upper = self.extent.upper().as_dvec3();

        for axis in 0..3 {
            let (b, c) = cross_axes(axis);
            let (b_lo, b_hi) = (
                bounds.min[b].floor().max(origin[b]),
                bounds.max[b].ceil().min(upper[b]),
            );
            let (c_lo, c_hi) = (
                bounds.min[c].floor().max(origin[c]),
                bounds.max[c].ceil().min(upper[c]),
            );

            let mut row_b = b_lo;
            while row_b < b_hi {
                let mut row_c = c_lo;
                while row_c < c_hi {
                    // Segments overshoot the extent by a cell so faces lying
                    // on its boundary planes are still crossed.
                    let mut start = DVec3::ZERO;
                    start[axis] = origin[axis] - 1.0;
                    start[b] = row_b;
                    start[c] = row_c;
                    let mut end = start;
                    end[axis] = upper[axis] + 1.0;

                    let segment = Segment::new(start + self.offset, end + self.offset);
                    self.cast(triangle, &segment, grid, stats);
                    row_c += 1.0;
                }
                row_b += 1.0;
            }
        }
    }

    fn cast(
        &self,
        triangle: &Triangle,
        segment: &Segment,
        grid: &mut Grid,
        stats: &mut RasterStats,
    ) {
        stats.segments += 1;
        let hits = [
            triangle.intersect_segment(segment),
            triangle.intersect_segment(&segment.reversed()),
        ];
        for point in hits.into_iter().flatten() {
            stats.hits += 1;
            match self.extent.cell_of(point) {
                Some(cell) => {
                    grid.set(cell, CellState::Solid);
                }
                None => stats.dropped += 1,
            }
        }
    }
}

/// The two axes perpendicular to `axis`, in ascending order.
const fn cross_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}
