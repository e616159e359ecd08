//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing Q-learning training,
//! allowing composable data collection without coupling the training loop
//! to specific log formats or metrics.

use crate::{
    Result,
    q_learning::{StepRecord, TrainingSummary},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_steps)` - Once per `train` call
/// 2. `on_step(record)` - After every Q-table update, bootstrap step included
/// 3. `on_training_end(summary)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use mouse_mdp::{ports::TrainingObserver, q_learning::StepRecord};
///
/// struct RewardCounter {
///     total: f64,
/// }
///
/// impl TrainingObserver for RewardCounter {
///     fn on_step(&mut self, record: &StepRecord) -> mouse_mdp::Result<()> {
///         self.total += record.reward;
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver: Send {
    /// Called when a training run starts.
    ///
    /// # Parameters
    ///
    /// * `total_steps` - Number of updates the run will perform
    fn on_training_start(&mut self, _total_steps: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each Q-table update.
    fn on_step(&mut self, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when a training run ends.
    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        Ok(())
    }
}
