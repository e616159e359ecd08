//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    gridworld::{Action, MIN_DIMENSION, RewardTable, State},
};

/// Configuration shared by the Q-learning agent and the policy iteration
/// solver.
///
/// Every constant the solvers use is carried here rather than hard-coded.
/// Missing JSON fields fall back to [`SolverConfig::default`].
///
/// # Examples
///
/// ```
/// use mouse_mdp::config::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_grid_dimension(5)
///     .with_discount(0.9)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Side length `n` of the `n x n` grid
    pub grid_dimension: usize,
    /// Number of actions; must equal [`Action::COUNT`]
    pub action_space: usize,
    /// Discount factor γ
    pub discount: f64,
    /// Learning rate α for Q-learning
    pub learning_rate: f64,
    /// Value iteration stops once the largest change in a sweep is below this
    pub convergence_threshold: f64,
    /// Hard cap on value iteration and policy evaluation sweeps
    pub max_sweeps: usize,
    /// Cap on outer policy iteration rounds
    pub max_policy_iterations: usize,
    /// Initial value of every Q-table entry
    pub q_init: f64,
    /// Agent start row
    pub start_row: usize,
    /// Agent start column
    pub start_col: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Reward for entering each cell type
    pub rewards: RewardTable,
}

impl SolverConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON or a partial reward
    /// table, and [`Error::InvalidConfiguration`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_grid_dimension(mut self, dimension: usize) -> Self {
        self.grid_dimension = dimension;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    pub fn with_max_policy_iterations(mut self, max_iterations: usize) -> Self {
        self.max_policy_iterations = max_iterations;
        self
    }

    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    pub fn with_start(mut self, row: usize, col: usize) -> Self {
        self.start_row = row;
        self.start_col = col;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Agent start position.
    pub fn start(&self) -> State {
        State::new(self.start_row, self.start_col)
    }

    /// Check every parameter range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.grid_dimension < MIN_DIMENSION {
            return Err(Error::configuration(format!(
                "grid dimension must be at least {MIN_DIMENSION}, got {}",
                self.grid_dimension
            )));
        }
        if self.action_space != Action::COUNT {
            return Err(Error::configuration(format!(
                "action space must be {}, got {}",
                Action::COUNT,
                self.action_space
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::configuration(format!(
                "discount must be in [0, 1], got {}",
                self.discount
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::configuration(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(self.convergence_threshold >= 0.0 && self.convergence_threshold.is_finite()) {
            return Err(Error::configuration(format!(
                "convergence threshold must be finite and non-negative, got {}",
                self.convergence_threshold
            )));
        }
        if self.max_sweeps == 0 {
            return Err(Error::configuration("max sweeps must be positive"));
        }
        if self.max_policy_iterations == 0 {
            return Err(Error::configuration(
                "max policy iterations must be positive",
            ));
        }
        if !self.q_init.is_finite() {
            return Err(Error::configuration(format!(
                "initial Q-value must be finite, got {}",
                self.q_init
            )));
        }
        if self.start_row >= self.grid_dimension || self.start_col >= self.grid_dimension {
            return Err(Error::CellOutOfBounds {
                row: self.start_row,
                col: self.start_col,
                dimension: self.grid_dimension,
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            grid_dimension: 4,
            action_space: Action::COUNT,
            discount: 0.5,
            learning_rate: 1.0,
            convergence_threshold: 1e-10,
            max_sweeps: 1000,
            max_policy_iterations: 100,
            q_init: 0.0,
            start_row: 0,
            start_col: 0,
            seed: None,
            rewards: RewardTable::default(),
        }
    }
}
