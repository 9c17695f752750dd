//! Cell states and shape orientations.
//!
//! Every grid cell holds exactly one [`CellState`]. Shape-bearing states carry
//! their orientation as a payload, and the shape family is recovered by an
//! exhaustive match rather than from any textual name.

use serde::{Deserialize, Serialize};

use crate::coords::{Axis, Direction, Sign};

/// Orientation of a slope block.
///
/// Each variant names the plane spanned by the two solid neighbors the slope
/// leans on, with the sign of each neighbor along the plane's axes in order.
/// `YZ(Pos, Neg)` leans on the `+Y` and `-Z` neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slope {
    XY(Sign, Sign),
    XZ(Sign, Sign),
    YZ(Sign, Sign),
}

impl Slope {
    /// All twelve slope orientations.
    pub const ALL: [Self; 12] = [
        Self::XY(Sign::Neg, Sign::Neg),
        Self::XY(Sign::Neg, Sign::Pos),
        Self::XY(Sign::Pos, Sign::Neg),
        Self::XY(Sign::Pos, Sign::Pos),
        Self::XZ(Sign::Neg, Sign::Neg),
        Self::XZ(Sign::Neg, Sign::Pos),
        Self::XZ(Sign::Pos, Sign::Neg),
        Self::XZ(Sign::Pos, Sign::Pos),
        Self::YZ(Sign::Neg, Sign::Neg),
        Self::YZ(Sign::Neg, Sign::Pos),
        Self::YZ(Sign::Pos, Sign::Neg),
        Self::YZ(Sign::Pos, Sign::Pos),
    ];

    /// The two directions whose neighbors the slope leans on.
    pub const fn directions(self) -> [Direction; 2] {
        match self {
            Self::XY(a, b) => [Direction::new(Axis::X, a), Direction::new(Axis::Y, b)],
            Self::XZ(a, b) => [Direction::new(Axis::X, a), Direction::new(Axis::Z, b)],
            Self::YZ(a, b) => [Direction::new(Axis::Y, a), Direction::new(Axis::Z, b)],
        }
    }

    /// Dense index in `0..12`.
    pub const fn index(self) -> u8 {
        match self {
            Self::XY(a, b) => (a.bit() << 1) | b.bit(),
            Self::XZ(a, b) => 4 + ((a.bit() << 1) | b.bit()),
            Self::YZ(a, b) => 8 + ((a.bit() << 1) | b.bit()),
        }
    }
}

/// One of the eight octants around a cell, as a sign per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Octant {
    pub x: Sign,
    pub y: Sign,
    pub z: Sign,
}

impl Octant {
    /// Create an octant from per-axis signs
    #[inline]
    pub const fn new(x: Sign, y: Sign, z: Sign) -> Self {
        Self { x, y, z }
    }

    /// All eight octants, ordered by [`Octant::index`].
    pub const ALL: [Self; 8] = [
        Self::new(Sign::Neg, Sign::Neg, Sign::Neg),
        Self::new(Sign::Neg, Sign::Neg, Sign::Pos),
        Self::new(Sign::Neg, Sign::Pos, Sign::Neg),
        Self::new(Sign::Neg, Sign::Pos, Sign::Pos),
        Self::new(Sign::Pos, Sign::Neg, Sign::Neg),
        Self::new(Sign::Pos, Sign::Neg, Sign::Pos),
        Self::new(Sign::Pos, Sign::Pos, Sign::Neg),
        Self::new(Sign::Pos, Sign::Pos, Sign::Pos),
    ];

    /// The three axis directions pointing into this octant.
    pub const fn directions(self) -> [Direction; 3] {
        [
            Direction::new(Axis::X, self.x),
            Direction::new(Axis::Y, self.y),
            Direction::new(Axis::Z, self.z),
        ]
    }

    /// Dense index in `0..8` (x is the high bit).
    pub const fn index(self) -> u8 {
        (self.x.bit() << 2) | (self.y.bit() << 1) | self.z.bit()
    }
}

/// Block shape family, the coarse discriminator handed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeFamily {
    /// Full straight block
    Cube,
    Slope,
    Corner,
    InverseCorner,
}

/// Orientation descriptor for an emitted block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Straight blocks have no meaningful rotation
    Fixed,
    Slope(Slope),
    Octant(Octant),
}

impl Orientation {
    /// Directions of the neighbors that decided this orientation: the solid
    /// cells under a slope or inverse corner, the slopes around a corner.
    /// Empty for straight blocks.
    pub fn directions(self) -> Vec<Direction> {
        match self {
            Self::Fixed => Vec::new(),
            Self::Slope(slope) => slope.directions().to_vec(),
            Self::Octant(octant) => octant.directions().to_vec(),
        }
    }
}

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Not yet classified; must not survive the exterior pass
    #[default]
    Empty,
    /// Fully occupied cube
    Solid,
    /// Enclosed interior space, never emitted
    Void,
    /// Exterior space; candidate for shape refinement, never emitted as-is
    Air,
    Slope(Slope),
    Corner(Octant),
    InverseCorner(Octant),
}

impl CellState {
    /// Shape family for block-producing states.
    #[inline]
    pub const fn family(self) -> Option<ShapeFamily> {
        match self {
            Self::Solid => Some(ShapeFamily::Cube),
            Self::Slope(_) => Some(ShapeFamily::Slope),
            Self::Corner(_) => Some(ShapeFamily::Corner),
            Self::InverseCorner(_) => Some(ShapeFamily::InverseCorner),
            Self::Empty | Self::Void | Self::Air => None,
        }
    }

    /// Orientation descriptor for block-producing states.
    #[inline]
    pub const fn orientation(self) -> Option<Orientation> {
        match self {
            Self::Solid => Some(Orientation::Fixed),
            Self::Slope(slope) => Some(Orientation::Slope(slope)),
            Self::Corner(octant) | Self::InverseCorner(octant) => {
                Some(Orientation::Octant(octant))
            }
            Self::Empty | Self::Void | Self::Air => None,
        }
    }

    /// Stable one-byte code, unique per state.
    ///
    /// `0..4` are the plain states, `4..16` slopes, `16..24` corners and
    /// `24..32` inverse corners.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Solid => 1,
            Self::Void => 2,
            Self::Air => 3,
            Self::Slope(slope) => 4 + slope.index(),
            Self::Corner(octant) => 16 + octant.index(),
            Self::InverseCorner(octant) => 24 + octant.index(),
        }
    }
}
