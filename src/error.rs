//! Error types for the mouse MDP crate

use thiserror::Error;

use crate::gridworld::{Action, CellType};

/// Main error type for the mouse MDP crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("reward table has no entry for cell type '{cell}'")]
    MissingReward { cell: CellType },

    #[error("state ({row}, {col}) has no valid actions")]
    NoValidActions { row: usize, col: usize },

    #[error("cell ({row}, {col}) is out of bounds for a {dimension}x{dimension} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        dimension: usize,
    },

    #[error("action {action} from ({row}, {col}) leaves the grid")]
    InvalidAction {
        row: usize,
        col: usize,
        action: Action,
    },

    #[error("expected {expected} states, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
