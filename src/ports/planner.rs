//! Planner port - common surface of the two solvers
//!
//! Both the model-free Q-learning agent and the model-based policy
//! iteration solver end in the same artifact: a deterministic policy over
//! the grid. Display and comparison code works against this trait.

use crate::{Result, policy::Policy};

/// A solver that produces a policy for the grid world.
pub trait Planner {
    /// Run the solver and return its policy.
    ///
    /// For Q-learning this trains for the configured number of steps and
    /// reads the greedy policy off the Q-table; for policy iteration it
    /// runs to a fixed point or the iteration cap.
    fn solve(&mut self) -> Result<Policy>;

    /// Solver name, used in logs and comparisons.
    fn name(&self) -> &str;
}
