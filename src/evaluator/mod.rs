//! Tick-driven rule evaluation.
//!
//! - [`EventEvaluator`]: runs event lists against a world, once per frame
//! - [`DelayedQueue`]: actions waiting for their deadline
//! - [`TickReport`]: per-tick counts for diagnostics

#[allow(clippy::module_inception)]
mod evaluator;
mod scheduler;
mod stats;

pub use evaluator::EventEvaluator;
pub use scheduler::{DelayedQueue, DueBatch, PendingAction};
pub use stats::TickReport;
