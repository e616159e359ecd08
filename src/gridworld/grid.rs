//! The square food grid

use serde::{Deserialize, Serialize};

use super::{CellType, RewardTable, State};
use crate::{Error, Result, config::SolverConfig};

/// Smallest supported grid dimension. A 1x1 grid has no valid moves.
pub const MIN_DIMENSION: usize = 2;

/// An `n x n` grid of food cells together with its reward table.
///
/// The grid holds no learning state. It is populated with
/// [`GridWorld::set_cell`] during setup and treated as read-only by the
/// solvers afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGridWorld")]
pub struct GridWorld {
    dimension: usize,
    cells: Vec<CellType>,
    rewards: RewardTable,
}

/// Unchecked wire form of [`GridWorld`].
#[derive(Deserialize)]
struct RawGridWorld {
    dimension: usize,
    cells: Vec<CellType>,
    rewards: RewardTable,
}

impl TryFrom<RawGridWorld> for GridWorld {
    type Error = Error;

    fn try_from(raw: RawGridWorld) -> Result<Self> {
        let mut world = Self::new(raw.dimension, CellType::Empty, raw.rewards)?;
        if raw.cells.len() != world.cells.len() {
            return Err(Error::DimensionMismatch {
                expected: world.cells.len(),
                got: raw.cells.len(),
            });
        }
        world.cells = raw.cells;
        Ok(world)
    }
}

impl GridWorld {
    /// Create a grid with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `dimension` is below 2.
    pub fn new(dimension: usize, fill: CellType, rewards: RewardTable) -> Result<Self> {
        if dimension < MIN_DIMENSION {
            return Err(Error::configuration(format!(
                "grid dimension must be at least {MIN_DIMENSION}, got {dimension}"
            )));
        }

        Ok(Self {
            dimension,
            cells: vec![fill; dimension * dimension],
            rewards,
        })
    }

    /// Create an empty grid sized and rewarded according to `config`.
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.grid_dimension, CellType::Empty, config.rewards)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of states (`n * n`).
    pub fn num_states(&self) -> usize {
        self.cells.len()
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Whether `(row, col)` lies on the grid.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.dimension && col < self.dimension
    }

    /// Build a state, checking that it lies on the grid.
    pub fn state(&self, row: usize, col: usize) -> Result<State> {
        self.check_bounds(row, col)?;
        Ok(State::new(row, col))
    }

    /// Iterate over every state in linear-index order.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.num_states()).map(|index| State::from_index(index, self.dimension))
    }

    /// Set the food type of one cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CellOutOfBounds`] if the position is off the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: CellType) -> Result<()> {
        self.check_bounds(row, col)?;
        let index = State::new(row, col).index(self.dimension);
        self.cells[index] = cell;
        Ok(())
    }

    /// Food type at a state.
    pub fn cell(&self, state: State) -> Result<CellType> {
        self.check_bounds(state.row, state.col)?;
        Ok(self.cells[state.index(self.dimension)])
    }

    /// Reward for entering the cell at `state`.
    pub fn reward_at(&self, state: State) -> Result<f64> {
        let cell = self.cell(state)?;
        Ok(f64::from(self.rewards.reward(cell)))
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if self.contains(row, col) {
            Ok(())
        } else {
            Err(Error::CellOutOfBounds {
                row,
                col,
                dimension: self.dimension,
            })
        }
    }
}
