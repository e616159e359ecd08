//! Observer adapters for Q-learning training
//!
//! Observers allow composable data collection during training without
//! coupling the training loop to specific output formats.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use tracing::{debug, info};

use crate::{
    Result,
    gridworld::State,
    ports::TrainingObserver,
    q_learning::{StepRecord, TrainingSummary},
};

/// Tracing observer - emits one event per update
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl TrainingObserver for TracingObserver {
    fn on_training_start(&mut self, total_steps: usize) -> Result<()> {
        info!(total_steps, "Q-learning training started");
        Ok(())
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        debug!(
            step = record.step,
            state = %record.state,
            action = %record.action,
            explored = record.explored,
            next_state = %record.next_state,
            reward = record.reward,
            q_before = record.q_before,
            q_after = record.q_after,
            "Q-table updated"
        );
        Ok(())
    }

    fn on_training_end(&mut self, summary: &TrainingSummary) -> Result<()> {
        info!(
            steps = summary.steps,
            explored = summary.explored_steps,
            total_reward = summary.total_reward,
            "Q-learning training finished"
        );
        Ok(())
    }
}

/// Aggregated training metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingMetrics {
    pub runs: usize,
    pub steps: usize,
    pub explored_steps: usize,
    pub total_reward: f64,
    /// Visits per state entered
    pub visits: BTreeMap<State, usize>,
}

impl TrainingMetrics {
    /// Fraction of steps that explored.
    pub fn exploration_rate(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.explored_steps as f64 / self.steps as f64
        }
    }

    /// Mean reward per step.
    pub fn mean_reward(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_reward / self.steps as f64
        }
    }
}

/// Metrics observer - accumulates counts across training runs
///
/// The metrics live behind a shared handle so they can be read after the
/// observer has been moved into an agent.
#[derive(Debug, Default, Clone)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<TrainingMetrics>>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the metrics gathered so far.
    pub fn metrics(&self) -> TrainingMetrics {
        match self.metrics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut TrainingMetrics)) {
        match self.metrics.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_training_start(&mut self, _total_steps: usize) -> Result<()> {
        self.update(|metrics| metrics.runs += 1);
        Ok(())
    }

    fn on_step(&mut self, record: &StepRecord) -> Result<()> {
        self.update(|metrics| {
            metrics.steps += 1;
            if record.explored {
                metrics.explored_steps += 1;
            }
            metrics.total_reward += record.reward;
            *metrics.visits.entry(record.next_state).or_insert(0) += 1;
        });
        Ok(())
    }
}
