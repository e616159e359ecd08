//! Model-based planning by value iteration and policy iteration
//!
//! Unlike Q-learning, these methods never walk the grid. They sweep every
//! state through the known transition model:
//!
//! - **Value iteration** repeats V(s) ← max_a [r(s,a) + γ V(s')] until the
//!   largest change in a sweep falls below the convergence threshold
//! - **Greedy extraction** picks, per state, the action maximizing
//!   r(s,a) + γ V(s') under the converged V
//! - **Policy iteration** alternates evaluation and extraction until the
//!   policy stops changing

pub mod bellman;
pub mod solver;

pub use solver::{
    PolicyIterationReport, PolicyIterationSolver, TIE_TOLERANCE, ValueIterationReport,
};
