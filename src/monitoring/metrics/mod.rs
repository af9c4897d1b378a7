//! Metrics recorder
//!
//! One sample per completed request, kept in a bounded in-memory buffer that
//! the health evaluator and the stats endpoint read from.

mod alerts;
mod bounded;
mod helpers;
mod sample;
mod store;


pub use alerts::{AlertSink, LogAlertSink};
pub use helpers::{calculate_average, index_percentile};
pub use sample::{EndpointSummary, MetricSample, MetricsSummary, NewSample};
pub use store::MetricsStore;
