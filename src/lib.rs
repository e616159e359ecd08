//! Mouse-searching-for-food MDP solvers
//!
//! This crate provides:
//! - A deterministic grid world where a mouse moves Up/Down/Left/Right and
//!   earns the reward of each food cell it enters
//! - Tabular epsilon-greedy Q-learning over that world
//! - Value iteration, greedy policy extraction and policy iteration over
//!   the same transition model
//! - Training observers for logging and metrics

pub mod config;
pub mod error;
pub mod gridworld;
pub mod observers;
pub mod policy;
pub mod policy_iteration;
pub mod ports;
pub mod q_learning;

pub use config::SolverConfig;
pub use error::{Error, Result};
pub use gridworld::{Action, CellType, Dynamics, GridWorld, RewardTable, State, Transition};
pub use observers::{MetricsObserver, TracingObserver, TrainingMetrics};
pub use policy::{Policy, ValueFunction};
pub use policy_iteration::{PolicyIterationReport, PolicyIterationSolver, ValueIterationReport};
pub use ports::{Planner, TrainingObserver};
pub use q_learning::{QLearningAgent, QTable, StepRecord, TrainingSummary};
