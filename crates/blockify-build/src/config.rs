//! Build configuration.

use blockify_core::constants::DEFAULT_MAX_CELLS;
use blockify_core::{Aabb, Error, Result};
use serde::{Deserialize, Serialize};

/// Size class of the structure being built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridClass {
    SmallShip,
    #[default]
    LargeShip,
    Station,
}

impl GridClass {
    /// Block size prefix used in subtype ids.
    pub const fn size_prefix(self) -> &'static str {
        match self {
            Self::SmallShip => "Small",
            Self::LargeShip | Self::Station => "Large",
        }
    }

    /// Edge length of one cube in meters.
    pub const fn cube_size(self) -> f64 {
        match self {
            Self::SmallShip => 0.5,
            Self::LargeShip | Self::Station => 2.5,
        }
    }

    /// Stations are anchored in place.
    pub const fn is_static(self) -> bool {
        matches!(self, Self::Station)
    }
}

/// Armor weight of every emitted block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorType {
    #[default]
    Light,
    Heavy,
}

impl ArmorType {
    /// Armor segment of subtype ids.
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Light => "Block",
            Self::Heavy => "HeavyBlock",
        }
    }
}

/// How mesh coordinates map onto grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModelScale {
    /// Multiply every vertex by a factor
    Multiple(f64),
    /// Scale so the longest side spans this many cells.
    ///
    /// The mesh is not moved, so scaled bounds that do not start on an
    /// integer straddle one extra cell along that axis.
    MaxLength(u32),
}

impl Default for ModelScale {
    fn default() -> Self {
        Self::Multiple(1.0)
    }
}

impl ModelScale {
    /// Vertex scale factor for a mesh with the given bounds.
    pub fn factor(self, bounds: &Aabb) -> Result<f64> {
        match self {
            Self::Multiple(factor) => {
                if factor.is_finite() && factor > 0.0 {
                    Ok(factor)
                } else {
                    Err(Error::InvalidInput(format!(
                        "scale factor must be positive, got {factor}"
                    )))
                }
            }
            Self::MaxLength(0) => Err(Error::InvalidInput(
                "target length must be at least one cell".to_string(),
            )),
            Self::MaxLength(cells) => {
                let longest = bounds.longest_side();
                if longest > 0.0 {
                    Ok(f64::from(cells) / longest)
                } else {
                    Ok(1.0)
                }
            }
        }
    }

    /// Longest-axis resolution to request from an external voxelizer.
    pub const fn resolution(self) -> Option<u32> {
        match self {
            Self::MaxLength(cells) => Some(cells),
            Self::Multiple(_) => None,
        }
    }
}

/// Settings for a [`StructureBuilder`](crate::StructureBuilder) run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Structure size class
    pub grid_class: GridClass,
    /// Armor weight
    pub armor: ArmorType,
    /// Mesh to grid scaling
    pub scale: ModelScale,
    /// Turn enclosed voids into solid blocks
    pub fill_interior: bool,
    /// Refine exterior cells into slopes and corners
    pub smooth: bool,
    /// Largest grid, in cells, a build may allocate
    pub max_cells: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            grid_class: GridClass::default(),
            armor: ArmorType::default(),
            scale: ModelScale::default(),
            fill_interior: false,
            smooth: true,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl BuildConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid class.
    #[must_use]
    pub fn with_grid_class(mut self, grid_class: GridClass) -> Self {
        self.grid_class = grid_class;
        self
    }

    /// Set the armor type.
    #[must_use]
    pub fn with_armor(mut self, armor: ArmorType) -> Self {
        self.armor = armor;
        self
    }

    /// Set the model scale.
    #[must_use]
    pub fn with_scale(mut self, scale: ModelScale) -> Self {
        self.scale = scale;
        self
    }

    /// Enable or disable interior filling.
    #[must_use]
    pub fn with_fill_interior(mut self, fill: bool) -> Self {
        self.fill_interior = fill;
        self
    }

    /// Enable or disable shape refinement.
    #[must_use]
    pub fn with_smoothing(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Set the cell budget.
    #[must_use]
    pub fn with_max_cells(mut self, max_cells: u64) -> Self {
        self.max_cells = max_cells;
        self
    }
}
