//! Q-table implementation for temporal difference learning

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    gridworld::{Action, Dynamics, MIN_DIMENSION, State},
    policy::Policy,
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Stored densely as an `n² x 4` row-major table: row `row * n + col`,
/// column [`Action::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQTable")]
pub struct QTable {
    /// Side length of the grid the table covers
    dimension: usize,
    /// Q-values, `Action::COUNT` per state
    q_values: Vec<f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value of every entry
    q_init: f64,
}

/// Unchecked wire form of [`QTable`].
#[derive(Deserialize)]
struct RawQTable {
    dimension: usize,
    q_values: Vec<f64>,
    learning_rate: f64,
    discount_factor: f64,
    q_init: f64,
}

impl TryFrom<RawQTable> for QTable {
    type Error = Error;

    fn try_from(raw: RawQTable) -> Result<Self> {
        if raw.dimension < MIN_DIMENSION {
            return Err(Error::configuration(format!(
                "grid dimension must be at least {MIN_DIMENSION}, got {}",
                raw.dimension
            )));
        }
        let expected = raw.dimension * raw.dimension * Action::COUNT;
        if raw.q_values.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: raw.q_values.len(),
            });
        }
        Ok(Self {
            dimension: raw.dimension,
            q_values: raw.q_values,
            learning_rate: raw.learning_rate,
            discount_factor: raw.discount_factor,
            q_init: raw.q_init,
        })
    }
}

impl QTable {
    /// Create a new Q-table with every entry set to `q_init`
    pub fn new(dimension: usize, learning_rate: f64, discount_factor: f64, q_init: f64) -> Self {
        Self {
            dimension,
            q_values: vec![q_init; dimension * dimension * Action::COUNT],
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    fn slot(&self, state: State, action: Action) -> Result<usize> {
        if state.row >= self.dimension || state.col >= self.dimension {
            return Err(Error::CellOutOfBounds {
                row: state.row,
                col: state.col,
                dimension: self.dimension,
            });
        }
        Ok(state.index(self.dimension) * Action::COUNT + action.index())
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: State, action: Action) -> Result<f64> {
        let slot = self.slot(state, action)?;
        Ok(self.q_values[slot])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: State, action: Action, value: f64) -> Result<()> {
        let slot = self.slot(state, action)?;
        self.q_values[slot] = value;
        Ok(())
    }

    /// Get maximum Q-value over the actions valid in a state
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidActions`] if no action is valid from `state`.
    pub fn max_over_valid_actions(&self, state: State, dynamics: &Dynamics<'_>) -> Result<f64> {
        self.best_valid(state, dynamics).map(|(_, q)| q)
    }

    /// Select the greedy action (highest Q-value) among valid actions
    ///
    /// Ties go to the earliest action in [`Action::ALL`].
    pub fn best_valid_action(&self, state: State, dynamics: &Dynamics<'_>) -> Result<Action> {
        self.best_valid(state, dynamics).map(|(action, _)| action)
    }

    fn best_valid(&self, state: State, dynamics: &Dynamics<'_>) -> Result<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        for action in dynamics.valid_actions(state) {
            let q = self.get(state, action)?;
            if best.is_none_or(|(_, best_q)| q > best_q) {
                best = Some((action, q));
            }
        }
        best.ok_or(Error::NoValidActions {
            row: state.row,
            col: state.col,
        })
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// `state` is the position *before* the move and keys the update;
    /// `next_state` is the position after it and bootstraps the target.
    /// Returns the new Q-value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if `action` is not valid from `state`,
    /// so entries of off-grid moves are never written.
    pub fn q_learning_update(
        &mut self,
        state: State,
        action: Action,
        reward: f64,
        next_state: State,
        dynamics: &Dynamics<'_>,
    ) -> Result<f64> {
        if !dynamics.is_valid(state, action) {
            return Err(Error::InvalidAction {
                row: state.row,
                col: state.col,
                action,
            });
        }
        let current_q = self.get(state, action)?;
        let max_next_q = self.max_over_valid_actions(next_state, dynamics)?;
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q)?;
        Ok(new_q)
    }

    /// Greedy policy: the best valid action in every state
    pub fn greedy_policy(&self, dynamics: &Dynamics<'_>) -> Result<Policy> {
        let actions = dynamics
            .world()
            .states()
            .map(|state| self.best_valid_action(state, dynamics))
            .collect::<Result<Vec<_>>>()?;
        Policy::new(self.dimension, actions)
    }

    /// All Q-values in row-major order
    pub fn values(&self) -> &[f64] {
        &self.q_values
    }

    /// One row of `Action::COUNT` values per state, in linear-index order
    pub fn as_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.q_values.chunks_exact(Action::COUNT)
    }

    /// Reset all Q-values to the initial value
    pub fn reset(&mut self) {
        self.q_values.fill(self.q_init);
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}
