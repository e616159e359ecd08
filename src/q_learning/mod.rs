//! Tabular Q-learning
//!
//! Model-free control over the grid world. The agent learns action values
//! from its own walk instead of sweeping the transition model.
//!
//! ## Update rule
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! where `s` is the position before the move, `s'` the position after it,
//! `r` the reward of the cell at `s'`, and the max runs over actions valid
//! from `s'` only.
//!
//! ## Usage Example
//!
//! ```no_run
//! use mouse_mdp::{
//!     config::SolverConfig,
//!     gridworld::{CellType, GridWorld},
//!     q_learning::QLearningAgent,
//! };
//!
//! let config = SolverConfig::default().with_seed(7);
//! let mut world = GridWorld::from_config(&config)?;
//! world.set_cell(2, 2, CellType::Cookie)?;
//!
//! let mut agent = QLearningAgent::new(world, &config)?;
//! agent.train(1000, 50)?;
//! let policy = agent.policy()?;
//! # Ok::<(), mouse_mdp::Error>(())
//! ```

pub mod agent;
pub mod q_table;

// Public re-exports
pub use agent::{QLearningAgent, StepRecord, TrainingSummary, select_uniform};
pub use q_table::QTable;
