//! Blockify pipeline timings
//!
//! Converts UV spheres of increasing size and logs what each build produced.
//! Stage-level counters are available with `RUST_LOG=blockify_voxel=debug`.

use std::f64::consts::{PI, TAU};
use std::time::Instant;

use anyhow::Context;
use blockify_build::{BlockRecord, BuildConfig, GridClass, ModelScale, StructureBuilder};
use blockify_core::Triangle;
use glam::DVec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Closed UV sphere centered on the origin
fn sphere(radius: f64, rings: u32, segments: u32) -> Vec<Triangle> {
    let point = |ring: u32, segment: u32| {
        let theta = PI * f64::from(ring) / f64::from(rings);
        let phi = TAU * f64::from(segment) / f64::from(segments);
        DVec3::new(
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

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Blockify pipeline timings");

    let mesh = sphere(1.0, 32, 64);
    for cells in [16, 32, 64, 128] {
        let config = BuildConfig::new()
            .with_grid_class(GridClass::SmallShip)
            .with_scale(ModelScale::MaxLength(cells));
        let builder = StructureBuilder::new(config);

        let start = Instant::now();
        let structure = builder
            .build_from_mesh(&mesh)
            .with_context(|| format!("building sphere at {cells} cells"))?;
        let mut blocks: Vec<BlockRecord> = Vec::new();
        structure.emit(&mut blocks);
        let elapsed = start.elapsed();

        let report = structure.report();
        let shapes = report.shapes.unwrap_or_default();
        let size = structure.world_size();
        info!(
            cells,
            blocks = blocks.len(),
            slopes = shapes.slopes,
            corners = shapes.corners,
            inverse_corners = shapes.inverse_corners,
            unmatched_air = shapes.unmatched,
            void = report.census.void,
            "{:.1}x{:.1}x{:.1} m in {:.2?}",
            size.x,
            size.y,
            size.z,
            elapsed
        );
    }

    Ok(())
}
