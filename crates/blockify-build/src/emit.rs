//! Block emission.
//!
//! The emitter walks a finished grid in lexicographic `(x, y, z)` order and
//! hands one [`BlockRecord`] per block-producing cell to a [`BlockSink`].

use blockify_core::{CellPos, Orientation, ShapeFamily};
use blockify_voxel::Grid;
use serde::{Deserialize, Serialize};

use crate::config::{ArmorType, GridClass};

/// One block to place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Grid cell
    pub pos: CellPos,
    pub family: ShapeFamily,
    pub orientation: Orientation,
    /// Host block subtype id, e.g. `LargeBlockArmorSlope`
    pub subtype: String,
}

/// Receiver for emitted blocks.
pub trait BlockSink {
    /// Accept one block.
    fn place(&mut self, record: BlockRecord);
}

impl BlockSink for Vec<BlockRecord> {
    fn place(&mut self, record: BlockRecord) {
        self.push(record);
    }
}

/// Subtype ids for each shape family at one size and armor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCatalog {
    cube: String,
    slope: String,
    corner: String,
    inverse_corner: String,
}

impl BlockCatalog {
    /// Build the catalog for a grid class and armor type.
    pub fn new(grid_class: GridClass, armor: ArmorType) -> Self {
        let prefix = format!("{}{}", grid_class.size_prefix(), armor.block_name());
        Self {
            cube: format!("{prefix}ArmorBlock"),
            slope: format!("{prefix}ArmorSlope"),
            corner: format!("{prefix}ArmorCorner"),
            inverse_corner: format!("{prefix}ArmorCornerInv"),
        }
    }

    /// Subtype id for a shape family.
    pub fn subtype(&self, family: ShapeFamily) -> &str {
        match family {
            ShapeFamily::Cube => &self.cube,
            ShapeFamily::Slope => &self.slope,
            ShapeFamily::Corner => &self.corner,
            ShapeFamily::InverseCorner => &self.inverse_corner,
        }
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new(GridClass::default(), ArmorType::default())
    }
}

/// Turns finished grids into block records.
#[derive(Clone, Debug, Default)]
pub struct BlockEmitter {
    catalog: BlockCatalog,
}

impl BlockEmitter {
    /// Create an emitter using the given catalog
    pub const fn new(catalog: BlockCatalog) -> Self {
        Self { catalog }
    }

    /// Send every block in `grid` to `sink`, returning how many were sent.
    ///
    /// `Void`, `Air` and `Empty` cells produce nothing.
    pub fn emit<S: BlockSink + ?Sized>(&self, grid: &Grid, sink: &mut S) -> usize {
        let _span = tracing::trace_span!("build.emit").entered();

        let mut emitted = 0;
        for (pos, state) in grid.iter() {
            let (Some(family), Some(orientation)) = (state.family(), state.orientation()) else {
                continue;
            };
            sink.place(BlockRecord {
                pos,
                family,
                orientation,
                subtype: self.catalog.subtype(family).to_string(),
            });
            emitted += 1;
        }

        tracing::debug!(blocks = emitted, "emitted blocks");
        emitted
    }

    /// Collect every block in `grid`.
    pub fn records(&self, grid: &Grid) -> Vec<BlockRecord> {
        let mut records = Vec::new();
        self.emit(grid, &mut records);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockify_core::{CellState, GridDims, Octant, Sign, Slope};

    #[test]
    fn catalog_names() {
        let catalog = BlockCatalog::new(GridClass::LargeShip, ArmorType::Heavy);
        assert_eq!(catalog.subtype(ShapeFamily::Slope), "LargeHeavyBlockArmorSlope");

        let catalog = BlockCatalog::new(GridClass::SmallShip, ArmorType::Light);
        assert_eq!(catalog.subtype(ShapeFamily::Cube), "SmallBlockArmorBlock");
        assert_eq!(catalog.subtype(ShapeFamily::Corner), "SmallBlockArmorCorner");
        assert_eq!(
            catalog.subtype(ShapeFamily::InverseCorner),
            "SmallBlockArmorCornerInv"
        );
    }

    #[test]
    fn only_blocks_are_emitted_in_order() {
        let mut grid = Grid::new(GridDims::new(2, 1, 3)).unwrap();
        let slope = Slope::XZ(Sign::Neg, Sign::Pos);
        let octant = Octant::new(Sign::Pos, Sign::Pos, Sign::Neg);
        grid.set(CellPos::new(1, 0, 2), CellState::Solid);
        grid.set(CellPos::new(0, 0, 1), CellState::Slope(slope));
        grid.set(CellPos::new(1, 0, 0), CellState::InverseCorner(octant));
        grid.set(CellPos::new(0, 0, 0), CellState::Void);
        grid.set(CellPos::new(0, 0, 2), CellState::Air);

        let records = BlockEmitter::default().records(&grid);
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.pos, r.family, r.orientation))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    CellPos::new(0, 0, 1),
                    ShapeFamily::Slope,
                    Orientation::Slope(slope)
                ),
                (
                    CellPos::new(1, 0, 0),
                    ShapeFamily::InverseCorner,
                    Orientation::Octant(octant)
                ),
                (CellPos::new(1, 0, 2), ShapeFamily::Cube, Orientation::Fixed),
            ]
        );
        assert_eq!(records[2].subtype, "LargeBlockArmorBlock");
    }

    #[test]
    fn emission_is_idempotent() {
        let mut grid = Grid::new(GridDims::splat(2)).unwrap();
        grid.replace_all(CellState::Empty, CellState::Solid);
        let emitter = BlockEmitter::default();
        assert_eq!(emitter.records(&grid), emitter.records(&grid));
    }

    /// Sink that only counts.
    struct Counter(usize);

    impl BlockSink for Counter {
        fn place(&mut self, _record: BlockRecord) {
            self.0 += 1;
        }
    }

    #[test]
    fn custom_sink() {
        let mut grid = Grid::new(GridDims::splat(3)).unwrap();
        grid.set(CellPos::new(1, 1, 1), CellState::Solid);
        let mut counter = Counter(0);
        assert_eq!(BlockEmitter::default().emit(&grid, &mut counter), 1);
        assert_eq!(counter.0, 1);
    }
}
