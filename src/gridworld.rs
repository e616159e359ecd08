//! Grid world model
//!
//! A mouse moves on an `n x n` grid of food cells. Each move enters a
//! neighbouring cell and earns that cell's reward; moves off the grid are
//! invalid.
//!
//! - [`GridWorld`] stores cell types and the reward table
//! - [`Dynamics`] computes transitions, validity and rewards
//! - [`State`] and [`Action`] are the MDP's state and action types

pub mod action;
pub mod cell;
pub mod dynamics;
pub mod grid;
pub mod state;

pub use action::Action;
pub use cell::{CellType, RewardTable};
pub use dynamics::{Dynamics, Transition};
pub use grid::{GridWorld, MIN_DIMENSION};
pub use state::State;
