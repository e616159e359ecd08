//! Policies and state-value functions over the grid.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    gridworld::{Action, State},
};

/// Deterministic policy: one action per state, indexed by `row * n + col`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    dimension: usize,
    actions: Vec<Action>,
}

impl Policy {
    /// Build a policy from per-state actions in linear-index order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless there are exactly `n * n`
    /// actions.
    pub fn new(dimension: usize, actions: Vec<Action>) -> Result<Self> {
        let expected = dimension * dimension;
        if actions.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: actions.len(),
            });
        }
        Ok(Self { dimension, actions })
    }

    /// A policy choosing `action` everywhere.
    pub fn uniform(dimension: usize, action: Action) -> Self {
        Self {
            dimension,
            actions: vec![action; dimension * dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Action chosen at `state`, or `None` if the state is off the grid.
    pub fn action(&self, state: State) -> Option<Action> {
        if state.row >= self.dimension || state.col >= self.dimension {
            return None;
        }
        self.actions.get(state.index(self.dimension)).copied()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Iterate over `(state, action)` pairs in linear-index order.
    pub fn iter(&self) -> impl Iterator<Item = (State, Action)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, &action)| (State::from_index(index, self.dimension), action))
    }

    /// Number of states where the two policies choose different actions.
    pub fn differences(&self, other: &Policy) -> usize {
        self.actions
            .iter()
            .zip(&other.actions)
            .filter(|(a, b)| a != b)
            .count()
            + self.actions.len().abs_diff(other.actions.len())
    }
}

/// State-value function `V(s)`, indexed by `row * n + col`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFunction {
    dimension: usize,
    values: Vec<f64>,
}

impl ValueFunction {
    /// All-zero value function.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            values: vec![0.0; dimension * dimension],
        }
    }

    pub(crate) fn from_values(dimension: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), dimension * dimension);
        Self { dimension, values }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Value of `state`, or `None` if the state is off the grid.
    pub fn get(&self, state: State) -> Option<f64> {
        if state.row >= self.dimension || state.col >= self.dimension {
            return None;
        }
        self.values.get(state.index(self.dimension)).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Largest absolute per-state difference between two value functions.
    pub fn max_abs_diff(&self, other: &ValueFunction) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}
