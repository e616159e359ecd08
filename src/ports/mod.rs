//! Ports - boundaries between the solvers and code that drives or observes them

pub mod observer;
pub mod planner;

pub use observer::TrainingObserver;
pub use planner::Planner;
