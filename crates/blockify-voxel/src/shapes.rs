//! Shape classification of exterior cells.
//!
//! Three passes run in a fixed order, each refining `Air` cells that touch
//! the surface:
//!
//! 1. inverse corners, from three mutually perpendicular `Solid` neighbors;
//! 2. slopes, from two perpendicular `Solid` neighbors;
//! 3. corners, from slopes laid down by pass 2 on two of three axes.
//!
//! Every rule is a pure function of the grid and a cell position. A pass
//! evaluates its rule against the grid as it stood when the pass began and
//! applies all assignments afterwards, so scan order never changes a result.

use blockify_core::{CellPos, CellState, Direction, Octant, Sign, Slope};

use crate::grid::Grid;

use Sign::{Neg, Pos};

/// Inverse-corner octants, highest priority first.
pub const INVERSE_CORNER_ORDER: [Octant; 8] = [
    Octant::new(Pos, Neg, Neg),
    Octant::new(Neg, Pos, Neg),
    Octant::new(Pos, Pos, Neg),
    Octant::new(Neg, Neg, Neg),
    Octant::new(Pos, Pos, Pos),
    Octant::new(Neg, Pos, Pos),
    Octant::new(Pos, Neg, Pos),
    Octant::new(Neg, Neg, Pos),
];

/// Slope orientations, highest priority first.
pub const SLOPE_ORDER: [Slope; 12] = [
    Slope::YZ(Pos, Pos),
    Slope::XY(Neg, Pos),
    Slope::XY(Pos, Pos),
    Slope::YZ(Pos, Neg),
    Slope::XZ(Neg, Pos),
    Slope::XZ(Pos, Pos),
    Slope::XZ(Neg, Neg),
    Slope::XZ(Pos, Neg),
    Slope::YZ(Neg, Pos),
    Slope::XY(Neg, Neg),
    Slope::XY(Pos, Neg),
    Slope::YZ(Neg, Neg),
];

/// Corner octants, highest priority first.
pub const CORNER_ORDER: [Octant; 8] = [
    Octant::new(Neg, Pos, Pos),
    Octant::new(Pos, Pos, Pos),
    Octant::new(Neg, Pos, Neg),
    Octant::new(Pos, Pos, Neg),
    Octant::new(Neg, Neg, Pos),
    Octant::new(Pos, Neg, Pos),
    Octant::new(Neg, Neg, Neg),
    Octant::new(Pos, Neg, Neg),
];

/// Per-pass assignment counts from [`classify_shapes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShapeStats {
    pub inverse_corners: usize,
    pub slopes: usize,
    pub corners: usize,
    /// `Air` cells touching a `Solid` face that no rule matched
    pub unmatched: usize,
}

/// Returns true if every listed neighbor of `pos` exists and is `Solid`.
fn all_solid(grid: &Grid, pos: CellPos, dirs: &[Direction]) -> bool {
    dirs.iter()
        .all(|&dir| grid.neighbor_is(pos, dir, CellState::Solid))
}

/// Inverse-corner orientation for an `Air` cell, if any.
///
/// Matches when the three axis neighbors pointing into an octant are all
/// `Solid`. Several octants can match at once; the first in
/// [`INVERSE_CORNER_ORDER`] wins.
pub fn inverse_corner_at(grid: &Grid, pos: CellPos) -> Option<Octant> {
    if grid.get(pos) != Some(CellState::Air) {
        return None;
    }
    INVERSE_CORNER_ORDER
        .into_iter()
        .find(|octant| all_solid(grid, pos, &octant.directions()))
}

/// Slope orientation for an `Air` cell, if any.
///
/// Matches when both neighbors a slope leans on are `Solid`; the third axis
/// is unconstrained. The first match in [`SLOPE_ORDER`] wins.
pub fn slope_at(grid: &Grid, pos: CellPos) -> Option<Slope> {
    if grid.get(pos) != Some(CellState::Air) {
        return None;
    }
    SLOPE_ORDER
        .into_iter()
        .find(|slope| all_solid(grid, pos, &slope.directions()))
}

/// The three neighbor facts that point to a corner in `octant`.
///
/// Looking along each axis into the octant, the neighbor must be the slope
/// spanning the other two axes with the octant's signs.
fn corner_evidence(octant: Octant) -> [(Direction, CellState); 3] {
    let [dx, dy, dz] = octant.directions();
    [
        (dz, CellState::Slope(Slope::XY(octant.x, octant.y))),
        (dx, CellState::Slope(Slope::YZ(octant.y, octant.z))),
        (dy, CellState::Slope(Slope::XZ(octant.x, octant.z))),
    ]
}

/// Corner orientation for an `Air` cell, if any.
///
/// Matches when at least two of the three slope neighbors from
/// [`corner_evidence`] are present. The first match in [`CORNER_ORDER`]
/// wins.
pub fn corner_at(grid: &Grid, pos: CellPos) -> Option<Octant> {
    if grid.get(pos) != Some(CellState::Air) {
        return None;
    }
    CORNER_ORDER.into_iter().find(|&octant| {
        corner_evidence(octant)
            .iter()
            .filter(|&&(dir, expected)| grid.neighbor_is(pos, dir, expected))
            .count()
            >= 2
    })
}

/// Evaluate `rule` for every `Air` cell against the current grid, then
/// apply the results. Returns the number of cells assigned.
fn run_pass(grid: &mut Grid, rule: impl Fn(&Grid, CellPos) -> Option<CellState>) -> usize {
    let assignments: Vec<(CellPos, CellState)> = grid
        .iter()
        .filter(|&(_, state)| state == CellState::Air)
        .filter_map(|(pos, _)| rule(grid, pos).map(|state| (pos, state)))
        .collect();
    for &(pos, state) in &assignments {
        grid.set(pos, state);
    }
    assignments.len()
}

/// Pass 1: tag inverse corners.
pub fn inverse_corner_pass(grid: &mut Grid) -> usize {
    let _span = tracing::trace_span!("voxel.shapes.inverse_corners").entered();
    run_pass(grid, |g, p| inverse_corner_at(g, p).map(CellState::InverseCorner))
}

/// Pass 2: tag slopes.
pub fn slope_pass(grid: &mut Grid) -> usize {
    let _span = tracing::trace_span!("voxel.shapes.slopes").entered();
    run_pass(grid, |g, p| slope_at(g, p).map(CellState::Slope))
}

/// Pass 3: tag corners.
pub fn corner_pass(grid: &mut Grid) -> usize {
    let _span = tracing::trace_span!("voxel.shapes.corners").entered();
    run_pass(grid, |g, p| corner_at(g, p).map(CellState::Corner))
}

/// Count `Air` cells with at least one `Solid` face neighbor.
pub fn unmatched_surface_air(grid: &Grid) -> usize {
    grid.iter()
        .filter(|&(pos, state)| {
            state == CellState::Air
                && Direction::ALL
                    .iter()
                    .any(|&dir| grid.neighbor_is(pos, dir, CellState::Solid))
        })
        .count()
}

/// Run all three passes in order.
pub fn classify_shapes(grid: &mut Grid) -> ShapeStats {
    let _span = tracing::trace_span!("voxel.shapes").entered();

    let inverse_corners = inverse_corner_pass(grid);
    let slopes = slope_pass(grid);
    let corners = corner_pass(grid);
    let unmatched = unmatched_surface_air(grid);

    tracing::debug!(inverse_corners, slopes, corners, unmatched, "classified shapes");

    ShapeStats {
        inverse_corners,
        slopes,
        corners,
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockify_core::GridDims;

    /// All-`Air` grid with the given cells `Solid`.
    fn air_with(dims: GridDims, solids: &[(u32, u32, u32)]) -> Grid {
        let mut grid = Grid::filled(dims, CellState::Air, u64::MAX).unwrap();
        for &(x, y, z) in solids {
            grid.set(CellPos::new(x, y, z), CellState::Solid);
        }
        grid
    }

    #[test]
    fn corner_notch_is_inverse_corner() {
        let grid = air_with(GridDims::splat(3), &[(2, 1, 1), (1, 0, 1), (1, 1, 0)]);
        let center = CellPos::new(1, 1, 1);
        assert_eq!(
            inverse_corner_at(&grid, center),
            Some(Octant::new(Pos, Neg, Neg))
        );
    }

    #[test]
    fn inverse_corner_priority() {
        // +X, -X, -Y and -Z all solid: both (+,-,-) and (-,-,-) match.
        let grid = air_with(
            GridDims::splat(3),
            &[(2, 1, 1), (0, 1, 1), (1, 0, 1), (1, 1, 0)],
        );
        assert_eq!(
            inverse_corner_at(&grid, CellPos::new(1, 1, 1)),
            Some(Octant::new(Pos, Neg, Neg))
        );
    }

    #[test]
    fn two_solids_make_a_slope() {
        let grid = air_with(GridDims::splat(3), &[(1, 2, 1), (1, 1, 2)]);
        let center = CellPos::new(1, 1, 1);
        assert_eq!(inverse_corner_at(&grid, center), None);
        assert_eq!(slope_at(&grid, center), Some(Slope::YZ(Pos, Pos)));
        assert_eq!(corner_at(&grid, center), None);
    }

    #[test]
    fn every_slope_is_reachable() {
        let center = CellPos::new(1, 1, 1);
        for slope in Slope::ALL {
            let mut grid = air_with(GridDims::splat(3), &[]);
            for dir in slope.directions() {
                let n = grid.dims().neighbor(center, dir).unwrap();
                grid.set(n, CellState::Solid);
            }
            assert_eq!(slope_at(&grid, center), Some(slope), "{slope:?}");
        }
    }

    #[test]
    fn slope_priority() {
        // +Y, +Z and -X solid: YZ(+,+) outranks XY(-,+) and XZ(-,+).
        let grid = air_with(GridDims::splat(3), &[(1, 2, 1), (1, 1, 2), (0, 1, 1)]);
        assert_eq!(
            slope_at(&grid, CellPos::new(1, 1, 1)),
            Some(Slope::YZ(Pos, Pos))
        );
    }

    #[test]
    fn opposite_solids_are_not_a_slope() {
        let grid = air_with(GridDims::splat(3), &[(0, 1, 1), (2, 1, 1)]);
        assert_eq!(slope_at(&grid, CellPos::new(1, 1, 1)), None);
    }

    #[test]
    fn out_of_range_neighbors_never_match() {
        // The corner cell has no -X, -Y or -Z neighbors at all.
        let grid = air_with(GridDims::splat(2), &[(1, 0, 0)]);
        let origin = CellPos::new(0, 0, 0);
        assert_eq!(inverse_corner_at(&grid, origin), None);
        assert_eq!(slope_at(&grid, origin), None);
    }

    #[test]
    fn only_air_is_a_candidate() {
        let mut grid = air_with(GridDims::splat(3), &[(1, 2, 1), (1, 1, 2)]);
        grid.set(CellPos::new(1, 1, 1), CellState::Void);
        assert_eq!(slope_at(&grid, CellPos::new(1, 1, 1)), None);
        slope_pass(&mut grid);
        assert_eq!(grid.get(CellPos::new(1, 1, 1)), Some(CellState::Void));
    }

    #[test]
    fn corner_from_two_slopes() {
        let mut grid = air_with(GridDims::splat(3), &[]);
        let center = CellPos::new(1, 1, 1);
        // Octant (-,+,+): +Z neighbor XY(-,+), -X neighbor YZ(+,+).
        grid.set(CellPos::new(1, 1, 2), CellState::Slope(Slope::XY(Neg, Pos)));
        grid.set(CellPos::new(0, 1, 1), CellState::Slope(Slope::YZ(Pos, Pos)));
        assert_eq!(corner_at(&grid, center), Some(Octant::new(Neg, Pos, Pos)));

        // A single slope is not enough.
        grid.set(CellPos::new(0, 1, 1), CellState::Air);
        assert_eq!(corner_at(&grid, center), None);
    }

    #[test]
    fn every_corner_is_reachable() {
        let center = CellPos::new(1, 1, 1);
        for octant in Octant::ALL {
            let mut grid = air_with(GridDims::splat(3), &[]);
            for (dir, state) in corner_evidence(octant).into_iter().skip(1) {
                let n = grid.dims().neighbor(center, dir).unwrap();
                grid.set(n, state);
            }
            assert_eq!(corner_at(&grid, center), Some(octant), "{octant:?}");
        }
    }

    #[test]
    fn inverse_corner_pass_runs_before_slopes() {
        // The notch cell would also satisfy XY(+,-), XZ(+,-) and YZ(-,-).
        let mut grid = air_with(GridDims::splat(3), &[(2, 1, 1), (1, 0, 1), (1, 1, 0)]);
        let center = CellPos::new(1, 1, 1);
        assert!(slope_at(&grid, center).is_some());

        classify_shapes(&mut grid);
        assert_eq!(
            grid.get(center),
            Some(CellState::InverseCorner(Octant::new(Pos, Neg, Neg)))
        );
    }

    #[test]
    fn l_ramp_is_a_slope_not_a_corner() {
        // Floor along y = 2 and a wall along z = 2 in the x = 1 column.
        let solids: Vec<_> = (0..3)
            .map(|z| (1, 2, z))
            .chain((0..3).map(|y| (1, y, 2)))
            .collect();
        let mut grid = air_with(GridDims::splat(3), &solids);
        let stats = classify_shapes(&mut grid);

        assert_eq!(
            grid.get(CellPos::new(1, 1, 1)),
            Some(CellState::Slope(Slope::YZ(Pos, Pos)))
        );
        assert_eq!(stats.inverse_corners, 0);
        assert!(grid.iter().all(|(_, s)| !matches!(s, CellState::Corner(_))));
    }

    #[test]
    fn passes_never_touch_non_air() {
        let mut grid = air_with(GridDims::splat(3), &[(2, 1, 1), (1, 0, 1), (1, 1, 0)]);
        grid.set(CellPos::new(0, 0, 0), CellState::Void);
        let before: Vec<_> = grid.iter().filter(|&(_, s)| s != CellState::Air).collect();
        classify_shapes(&mut grid);
        for (pos, state) in before {
            assert_eq!(grid.get(pos), Some(state));
        }
    }

    #[test]
    fn unmatched_air_is_counted() {
        // A lone solid: its face neighbors touch it but match no rule.
        let mut grid = air_with(GridDims::splat(3), &[(1, 1, 1)]);
        let stats = classify_shapes(&mut grid);
        assert_eq!(stats.inverse_corners + stats.slopes + stats.corners, 0);
        assert_eq!(stats.unmatched, 6);
    }

    #[test]
    fn classification_is_deterministic() {
        let solids: Vec<_> = (0..4).flat_map(|x| (0..4).map(move |z| (x, 0, z))).collect();
        let mut a = air_with(GridDims::new(4, 3, 4), &solids);
        a.set(CellPos::new(1, 1, 1), CellState::Solid);
        let mut b = a.clone();
        assert_eq!(classify_shapes(&mut a), classify_shapes(&mut b));
        assert_eq!(a, b);
    }
}
