//! Common test utilities for the mouse MDP test suite.
//!
//! This module provides the reference grids and helpers shared across
//! integration tests.

#![allow(dead_code)]

use mouse_mdp::{CellType, GridWorld, RewardTable, SolverConfig};

/// Install a tracing subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reference configuration: 4x4 grid, α = 1, γ = 0.5.
pub fn mouse_config() -> SolverConfig {
    SolverConfig::default()
        .with_grid_dimension(4)
        .with_learning_rate(1.0)
        .with_discount(0.5)
        .with_rewards(RewardTable::new(2, 100, -2, 0))
}

/// Reference world: Salad at (0,1), Cheese at (2,1), Cookie at (2,2).
pub fn mouse_world() -> GridWorld {
    let mut world =
        GridWorld::from_config(&mouse_config()).expect("reference config should be valid");
    world
        .set_cell(0, 1, CellType::Salad)
        .expect("cell on grid");
    world
        .set_cell(2, 1, CellType::Cheese)
        .expect("cell on grid");
    world
        .set_cell(2, 2, CellType::Cookie)
        .expect("cell on grid");
    world
}

/// An `n x n` grid with no food anywhere.
pub fn empty_world(dimension: usize) -> GridWorld {
    GridWorld::new(dimension, CellType::Empty, RewardTable::default())
        .expect("dimension should be valid")
}

pub fn approx_eq_tol(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
