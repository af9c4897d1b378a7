//! Health evaluation
//!
//! Aggregates the recent sample window, process memory, database timings and
//! cache counters into a three-level status with human-readable alerts.

mod evaluator;
mod types;


pub use evaluator::{HealthEvaluator, derive_status};
pub use types::*;
