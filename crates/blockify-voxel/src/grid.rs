//! Dense occupancy grid.
//!
//! A grid is a single owned buffer of [`CellState`] with dimensions fixed at
//! construction. Each pipeline stage borrows it mutably in turn; nothing
//! outside the owning pipeline run ever sees it.

use blockify_core::constants::DEFAULT_MAX_CELLS;
use blockify_core::{CellPos, CellState, Direction, Error, GridDims, Result};

/// Validate grid dimensions against a cell budget without allocating.
pub fn check_dims(dims: GridDims, max_cells: u64) -> Result<()> {
    if dims.is_empty() {
        return Err(Error::InvalidInput(format!(
            "grid dimensions must be positive, got {}x{}x{}",
            dims.x, dims.y, dims.z
        )));
    }
    let cells = dims.cell_count();
    if cells > max_cells || usize::try_from(cells).is_err() {
        return Err(Error::ResourceExhausted {
            cells,
            limit: max_cells,
        });
    }
    Ok(())
}

/// Per-state cell counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub empty: usize,
    pub solid: usize,
    pub void: usize,
    pub air: usize,
    pub slopes: usize,
    pub corners: usize,
    pub inverse_corners: usize,
}

impl Census {
    /// Number of cells that produce a block.
    pub const fn blocks(&self) -> usize {
        self.solid + self.slopes + self.corners + self.inverse_corners
    }
}

/// Three-dimensional array of cell states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dims: GridDims,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an all-`Empty` grid within the default cell budget.
    pub fn new(dims: GridDims) -> Result<Self> {
        Self::with_limit(dims, DEFAULT_MAX_CELLS)
    }

    /// Create an all-`Empty` grid, failing before allocation if it would
    /// hold more than `max_cells` cells.
    pub fn with_limit(dims: GridDims, max_cells: u64) -> Result<Self> {
        Self::filled(dims, CellState::Empty, max_cells)
    }

    /// Create a grid with every cell set to `state`.
    pub fn filled(dims: GridDims, state: CellState, max_cells: u64) -> Result<Self> {
        check_dims(dims, max_cells)?;
        Ok(Self {
            dims,
            cells: vec![state; dims.cell_count() as usize],
        })
    }

    /// Wrap cells already laid out in storage order.
    pub fn from_cells(dims: GridDims, cells: Vec<CellState>) -> Result<Self> {
        check_dims(dims, u64::MAX)?;
        if cells.len() as u64 != dims.cell_count() {
            return Err(Error::InvalidInput(format!(
                "expected {} cells, got {}",
                dims.cell_count(),
                cells.len()
            )));
        }
        Ok(Self { dims, cells })
    }

    /// Grid dimensions
    #[inline]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; grids have at least one cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// State at a position, `None` outside the grid.
    #[inline]
    pub fn get(&self, pos: CellPos) -> Option<CellState> {
        self.dims
            .contains(pos)
            .then(|| self.cells[self.dims.to_index(pos)])
    }

    /// Set the state at a position. Positions outside the grid are ignored
    /// and reported as `false`.
    #[inline]
    pub fn set(&mut self, pos: CellPos, state: CellState) -> bool {
        if !self.dims.contains(pos) {
            return false;
        }
        let index = self.dims.to_index(pos);
        self.cells[index] = state;
        true
    }

    /// State of the neighbor one step from `pos` in `dir`.
    #[inline]
    pub fn neighbor(&self, pos: CellPos, dir: Direction) -> Option<CellState> {
        self.dims
            .neighbor(pos, dir)
            .map(|n| self.cells[self.dims.to_index(n)])
    }

    /// Returns true if the neighbor in `dir` exists and is exactly `expected`.
    #[inline]
    pub fn neighbor_is(&self, pos: CellPos, dir: Direction, expected: CellState) -> bool {
        self.neighbor(pos, dir) == Some(expected)
    }

    /// Iterate all cells with their positions in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &state)| (self.dims.from_index(i), state))
    }

    /// Replace every `from` cell with `to`, returning how many changed.
    pub fn replace_all(&mut self, from: CellState, to: CellState) -> usize {
        let mut changed = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == from) {
            *cell = to;
            changed += 1;
        }
        changed
    }

    /// Count cells in each state.
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for cell in &self.cells {
            match cell {
                CellState::Empty => census.empty += 1,
                CellState::Solid => census.solid += 1,
                CellState::Void => census.void += 1,
                CellState::Air => census.air += 1,
                CellState::Slope(_) => census.slopes += 1,
                CellState::Corner(_) => census.corners += 1,
                CellState::InverseCorner(_) => census.inverse_corners += 1,
            }
        }
        census
    }

    /// One byte per cell in storage order (see [`CellState::to_byte`]).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.to_byte()).collect()
    }
}
