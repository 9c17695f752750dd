//! Text rendering of grids for snapshot tests.

use std::fmt::Write;

use blockify_core::{CellPos, CellState};
use blockify_voxel::Grid;

/// One character per cell state.
///
/// Plain states: `?` empty, `#` solid, `o` void, `.` air. Shapes: `s`
/// slope, `c` corner, `i` inverse corner.
pub const fn state_char(state: CellState) -> char {
    match state {
        CellState::Empty => '?',
        CellState::Solid => '#',
        CellState::Void => 'o',
        CellState::Air => '.',
        CellState::Slope(_) => 's',
        CellState::Corner(_) => 'c',
        CellState::InverseCorner(_) => 'i',
    }
}

/// Render every z slice as a block of rows, y increasing downwards and x
/// increasing to the right.
pub fn dump_layers(grid: &Grid) -> String {
    let dims = grid.dims();
    let mut out = String::new();
    for z in 0..dims.z {
        let _ = writeln!(out, "z={z}");
        for y in 0..dims.y {
            let row: String = (0..dims.x)
                .filter_map(|x| grid.get(CellPos::new(x, y, z)))
                .map(state_char)
                .collect();
            out.push_str(&row);
            out.push('\n');
        }
    }
    out
}
