//! Grid coordinates, dimensions, and axis directions.

use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

/// Sign of a unit step along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Neg,
    Pos,
}

impl Sign {
    /// Unit step for this sign (-1 or +1).
    #[inline]
    pub const fn step(self) -> i32 {
        match self {
            Self::Neg => -1,
            Self::Pos => 1,
        }
    }

    /// The opposite sign.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Neg => Self::Pos,
            Self::Pos => Self::Neg,
        }
    }

    /// Single-bit encoding (Pos = 1).
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Neg => 0,
            Self::Pos => 1,
        }
    }
}

/// Principal grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One of the six axis-aligned unit directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Direction {
    pub axis: Axis,
    pub sign: Sign,
}

impl Direction {
    pub const POS_X: Self = Self::new(Axis::X, Sign::Pos);
    pub const NEG_X: Self = Self::new(Axis::X, Sign::Neg);
    pub const POS_Y: Self = Self::new(Axis::Y, Sign::Pos);
    pub const NEG_Y: Self = Self::new(Axis::Y, Sign::Neg);
    pub const POS_Z: Self = Self::new(Axis::Z, Sign::Pos);
    pub const NEG_Z: Self = Self::new(Axis::Z, Sign::Neg);

    /// The six face directions (6-connectivity).
    pub const ALL: [Self; 6] = [
        Self::NEG_X,
        Self::POS_X,
        Self::NEG_Y,
        Self::POS_Y,
        Self::NEG_Z,
        Self::POS_Z,
    ];

    /// Create a direction from an axis and a sign
    #[inline]
    pub const fn new(axis: Axis, sign: Sign) -> Self {
        Self { axis, sign }
    }

    /// Unit offset vector.
    #[inline]
    pub const fn offset(self) -> IVec3 {
        let s = self.sign.step();
        match self.axis {
            Axis::X => IVec3::new(s, 0, 0),
            Axis::Y => IVec3::new(0, s, 0),
            Axis::Z => IVec3::new(0, 0, s),
        }
    }

    /// The direction pointing the other way.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::new(self.axis, self.sign.flip())
    }
}

/// Position of a cell within a grid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl CellPos {
    /// Create a new cell position
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Convert to signed glam `IVec3`
    #[inline]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }
}

/// Grid dimensions in cells per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridDims {
    /// Create new grid dimensions
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Cube-shaped dimensions
    #[inline]
    pub const fn splat(n: u32) -> Self {
        Self::new(n, n, n)
    }

    /// Total number of cells, saturating at `u64::MAX`.
    #[inline]
    pub const fn cell_count(self) -> u64 {
        (self.x as u64)
            .saturating_mul(self.y as u64)
            .saturating_mul(self.z as u64)
    }

    /// Returns true if any axis has zero cells
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// Check if a position lies inside the grid
    #[inline]
    pub const fn contains(self, pos: CellPos) -> bool {
        pos.x < self.x && pos.y < self.y && pos.z < self.z
    }

    /// Check if a signed position lies inside the grid
    #[inline]
    pub const fn contains_signed(self, pos: IVec3) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.x
            && (pos.y as u32) < self.y
            && (pos.z as u32) < self.z
    }

    /// Linear index for flat storage.
    ///
    /// Storage is lexicographic in `(x, y, z)`: z varies fastest, so walking
    /// indices in order visits cells in the same order as nested x/y/z loops.
    #[inline]
    pub const fn to_index(self, pos: CellPos) -> usize {
        ((pos.x as usize * self.y as usize) + pos.y as usize) * self.z as usize + pos.z as usize
    }

    /// Inverse of [`GridDims::to_index`]
    #[inline]
    pub const fn from_index(self, index: usize) -> CellPos {
        let z = index % self.z as usize;
        let y = (index / self.z as usize) % self.y as usize;
        let x = index / (self.z as usize * self.y as usize);
        CellPos::new(x as u32, y as u32, z as u32)
    }

    /// The cell one step from `pos` in `dir`, if it is inside the grid.
    #[inline]
    pub fn neighbor(self, pos: CellPos, dir: Direction) -> Option<CellPos> {
        let next = pos.to_ivec3() + dir.offset();
        self.contains_signed(next)
            .then(|| CellPos::new(next.x as u32, next.y as u32, next.z as u32))
    }

    /// The eight corner cells. Duplicates appear when an axis is one cell wide.
    pub const fn corners(self) -> [CellPos; 8] {
        let (mx, my, mz) = (
            self.x.saturating_sub(1),
            self.y.saturating_sub(1),
            self.z.saturating_sub(1),
        );
        [
            CellPos::new(0, 0, 0),
            CellPos::new(mx, 0, 0),
            CellPos::new(0, my, 0),
            CellPos::new(0, 0, mz),
            CellPos::new(mx, my, 0),
            CellPos::new(0, my, mz),
            CellPos::new(mx, 0, mz),
            CellPos::new(mx, my, mz),
        ]
    }

    /// Convert to glam `UVec3`
    #[inline]
    pub const fn to_uvec3(self) -> UVec3 {
        UVec3::new(self.x, self.y, self.z)
    }
}
