//! Reference grids and meshes.
//!
//! Grids are returned before exterior classification: open space is still
//! `Empty` so fixtures can be fed through the full pipeline.

use std::f64::consts::{PI, TAU};

use blockify_core::{CellPos, CellState, GridDims, Triangle};
use blockify_voxel::Grid;
use glam::{DQuat, DVec3};

use crate::{Result, TestError};

fn grid(dims: GridDims, solids: impl IntoIterator<Item = (u32, u32, u32)>) -> Grid {
    let mut grid = Grid::new(dims).expect("fixture dimensions are valid");
    for (x, y, z) in solids {
        grid.set(CellPos::new(x, y, z), CellState::Solid);
    }
    grid
}

/// Parse a grid from text layers.
///
/// Each layer is one z slice; its non-blank lines are rows of increasing
/// y and characters are cells of increasing x. `#` is `Solid`, `o` is
/// `Void` and `.` is `Empty`.
pub fn grid_from_layers(layers: &[&str]) -> Result<Grid> {
    let rows: Vec<Vec<&str>> = layers
        .iter()
        .map(|layer| {
            layer
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect()
        })
        .collect();

    let depth = rows.len();
    let height = rows.first().map_or(0, Vec::len);
    let width = rows
        .first()
        .and_then(|layer| layer.first())
        .map_or(0, |line| line.len());

    let mut grid = Grid::new(GridDims::new(width as u32, height as u32, depth as u32))?;
    for (z, layer) in rows.iter().enumerate() {
        if layer.len() != height {
            return Err(TestError::Fixture(format!(
                "layer {z} has {} rows, expected {height}",
                layer.len()
            )));
        }
        for (y, line) in layer.iter().enumerate() {
            if line.len() != width {
                return Err(TestError::Fixture(format!(
                    "layer {z} row {y} has {} cells, expected {width}",
                    line.len()
                )));
            }
            for (x, c) in line.chars().enumerate() {
                let state = match c {
                    '#' => CellState::Solid,
                    'o' => CellState::Void,
                    '.' => CellState::Empty,
                    other => {
                        return Err(TestError::Fixture(format!("unknown cell '{other}'")));
                    }
                };
                grid.set(CellPos::new(x as u32, y as u32, z as u32), state);
            }
        }
    }
    Ok(grid)
}

/// 3x3x3 solid cube with an empty center.
pub fn hollow_shell() -> Grid {
    let mut grid = grid(GridDims::splat(3), std::iter::empty());
    grid.replace_all(CellState::Empty, CellState::Solid);
    grid.set(CellPos::new(1, 1, 1), CellState::Empty);
    grid
}

/// 3x3x3 grid whose center touches solids at +X, -Y and -Z only.
pub fn corner_notch() -> Grid {
    grid(GridDims::splat(3), [(2, 1, 1), (1, 0, 1), (1, 1, 0)])
}

/// 3x3x3 grid with a floor at y = 2 and a wall at z = 2 in the x = 1
/// slice; the center touches solids at +Y and +Z only.
pub fn l_ramp() -> Grid {
    let floor = (0..3).map(|z| (1, 2, z));
    let wall = (0..2).map(|y| (1, y, 2));
    grid(GridDims::splat(3), floor.chain(wall))
}

/// 9x9x9 "staggered star": three orthogonal 5x5 plates through the center
/// with a full-length spine along each axis.
pub fn staggered_star() -> Grid {
    let plates = (2..7).flat_map(|i| (2..7).flat_map(move |j| [(i, j, 4), (i, 4, j), (4, i, j)]));
    let spines = (0..9).flat_map(|i| [(i, 4, 4), (4, i, 4), (4, 4, i)]);
    grid(GridDims::splat(9), plates.chain(spines))
}

/// 12x12x12 tray: a full floor at z = 0 and a one-cell rim at z = 1.
pub fn tray() -> Grid {
    let floor = (0..12).flat_map(|i| (0..12).map(move |j| (i, j, 0)));
    let rim = (0..12).flat_map(|i| [(i, 0, 1), (i, 11, 1), (0, i, 1), (11, i, 1)]);
    grid(GridDims::splat(12), floor.chain(rim))
}

/// Closed axis-aligned box of twelve triangles with outward winding.
pub fn box_mesh(min: DVec3, max: DVec3) -> Vec<Triangle> {
    let p = |x: bool, y: bool, z: bool| {
        DVec3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    let faces = [
        [
            p(false, false, false),
            p(false, false, true),
            p(false, true, true),
            p(false, true, false),
        ],
        [
            p(true, false, false),
            p(true, true, false),
            p(true, true, true),
            p(true, false, true),
        ],
        [
            p(false, false, false),
            p(true, false, false),
            p(true, false, true),
            p(false, false, true),
        ],
        [
            p(false, true, false),
            p(false, true, true),
            p(true, true, true),
            p(true, true, false),
        ],
        [
            p(false, false, false),
            p(false, true, false),
            p(true, true, false),
            p(true, false, false),
        ],
        [
            p(false, false, true),
            p(true, false, true),
            p(true, true, true),
            p(false, true, true),
        ],
    ];
    faces
        .into_iter()
        .flat_map(|[a, b, c, d]| [Triangle::new(a, b, c), Triangle::new(a, c, d)])
        .collect()
}

/// Cube of half-size `half` around `center`, turned by `rotation`.
pub fn rotated_box(center: DVec3, half: f64, rotation: DQuat) -> Vec<Triangle> {
    box_mesh(DVec3::splat(-half), DVec3::splat(half))
        .into_iter()
        .map(|t| {
            let [a, b, c] = t.vertices().map(|v| rotation * v + center);
            Triangle::new(a, b, c)
        })
        .collect()
}

/// Closed UV sphere. The pole rows produce zero-area triangles.
pub fn uv_sphere(center: DVec3, radius: f64, rings: u32, segments: u32) -> Vec<Triangle> {
    let point = |ring: u32, segment: u32| {
        let theta = PI * f64::from(ring) / f64::from(rings);
        let phi = TAU * f64::from(segment) / f64::from(segments);
        center
            + DVec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ) * radius
    };

    (0..rings)
        .flat_map(|ring| (0..segments).map(move |segment| (ring, segment)))
        .flat_map(|(ring, segment)| {
            let a = point(ring, segment);
            let b = point(ring + 1, segment);
            let c = point(ring + 1, segment + 1);
            let d = point(ring, segment + 1);
            [Triangle::new(a, b, c), Triangle::new(a, c, d)]
        })
        .collect()
}
