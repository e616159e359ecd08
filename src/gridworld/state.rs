//! Agent positions on the grid

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position `(row, col)` on an `n x n` grid.
///
/// States carry no cell type; the type is always looked up in the
/// [`GridWorld`](super::GridWorld) so it cannot go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub row: usize,
    pub col: usize,
}

impl State {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Linear table index `row * n + col`.
    pub const fn index(self, dimension: usize) -> usize {
        self.row * dimension + self.col
    }

    /// Inverse of [`State::index`].
    pub const fn from_index(index: usize, dimension: usize) -> Self {
        Self {
            row: index / dimension,
            col: index % dimension,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_index() {
        assert_eq!(State::new(0, 0).index(4), 0);
        assert_eq!(State::new(2, 1).index(4), 9);
        assert_eq!(State::new(3, 3).index(4), 15);
    }

    #[test]
    fn test_from_index_inverts_index() {
        for index in 0..16 {
            assert_eq!(State::from_index(index, 4).index(4), index);
        }
    }
}
