//! Exterior flood fill.
//!
//! Empty space reachable from the grid corners through face-adjacent empty
//! cells is exterior `Air`; whatever stays unreached is enclosed `Void`.

use std::collections::VecDeque;

use blockify_core::{CellState, Direction};

use crate::grid::Grid;

/// Outcome of [`classify_exterior`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExteriorStats {
    /// Corner cells that started the fill
    pub seeds: usize,
    /// Cells marked `Air`
    pub air: usize,
    /// Cells marked `Void`
    pub void: usize,
}

/// Resolve every `Empty` cell to `Air` or `Void`.
///
/// Seeds are the eight corner cells that are still `Empty`; the fill then
/// spreads through 6-connected `Empty` cells only, so diagonal gaps do not
/// leak. A grid whose corners are all occupied has no exterior.
pub fn classify_exterior(grid: &mut Grid) -> ExteriorStats {
    let _span = tracing::trace_span!("voxel.exterior").entered();

    let dims = grid.dims();
    let mut stats = ExteriorStats::default();
    let mut queue = VecDeque::new();

    for corner in dims.corners() {
        if grid.get(corner) == Some(CellState::Empty) {
            grid.set(corner, CellState::Air);
            queue.push_back(corner);
            stats.seeds += 1;
            stats.air += 1;
        }
    }

    while let Some(pos) = queue.pop_front() {
        for dir in Direction::ALL {
            let Some(next) = dims.neighbor(pos, dir) else {
                continue;
            };
            if grid.get(next) == Some(CellState::Empty) {
                grid.set(next, CellState::Air);
                queue.push_back(next);
                stats.air += 1;
            }
        }
    }

    stats.void = grid.replace_all(CellState::Empty, CellState::Void);

    tracing::debug!(
        seeds = stats.seeds,
        air = stats.air,
        void = stats.void,
        "classified exterior"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockify_core::{CellPos, GridDims};

    fn shell(size: u32, inset: u32) -> Grid {
        let dims = GridDims::splat(size);
        let mut grid = Grid::new(dims).unwrap();
        let (lo, hi) = (inset, size - 1 - inset);
        for x in lo..=hi {
            for y in lo..=hi {
                for z in lo..=hi {
                    let on_face = [x, y, z].iter().any(|&c| c == lo || c == hi);
                    if on_face {
                        grid.set(CellPos::new(x, y, z), CellState::Solid);
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn hollow_shell_has_void_center() {
        let mut grid = shell(3, 0);
        let stats = classify_exterior(&mut grid);
        assert_eq!(stats.seeds, 0);
        assert_eq!(stats.air, 0);
        assert_eq!(stats.void, 1);
        assert_eq!(grid.get(CellPos::new(1, 1, 1)), Some(CellState::Void));
        assert_eq!(grid.census().solid, 26);
    }

    #[test]
    fn padded_shell_has_air_outside() {
        let mut grid = shell(5, 1);
        let stats = classify_exterior(&mut grid);
        assert_eq!(stats.seeds, 8);
        assert_eq!(stats.air, 125 - 27);
        assert_eq!(stats.void, 1);
        assert_eq!(grid.census().empty, 0);
    }

    #[test]
    fn diagonal_gap_does_not_leak() {
        let mut grid = Grid::filled(GridDims::splat(3), CellState::Solid, 27).unwrap();
        grid.set(CellPos::new(0, 0, 0), CellState::Empty);
        grid.set(CellPos::new(1, 1, 1), CellState::Empty);

        classify_exterior(&mut grid);
        assert_eq!(grid.get(CellPos::new(0, 0, 0)), Some(CellState::Air));
        assert_eq!(grid.get(CellPos::new(1, 1, 1)), Some(CellState::Void));
    }

    #[test]
    fn empty_grid_is_all_air() {
        let mut grid = Grid::new(GridDims::new(4, 2, 3)).unwrap();
        let stats = classify_exterior(&mut grid);
        assert_eq!(stats.air, 24);
        assert_eq!(stats.void, 0);
    }

    #[test]
    fn thin_grid_seeds_once_per_distinct_corner() {
        let mut grid = Grid::new(GridDims::new(1, 1, 4)).unwrap();
        let stats = classify_exterior(&mut grid);
        assert_eq!(stats.seeds, 2);
        assert_eq!(stats.air, 4);
    }

    #[test]
    fn open_side_lets_air_in() {
        let mut grid = shell(3, 0);
        // Face-center hole plus a face-adjacent path to a corner.
        grid.set(CellPos::new(1, 1, 0), CellState::Empty);
        grid.set(CellPos::new(0, 0, 0), CellState::Empty);
        grid.set(CellPos::new(1, 0, 0), CellState::Empty);

        classify_exterior(&mut grid);
        assert_eq!(grid.get(CellPos::new(1, 1, 1)), Some(CellState::Air));
        assert_eq!(grid.census().void, 0);
    }
}
