//! Monitoring and adaptive control
//!
//! The metrics recorder, the health evaluator built on top of it, the
//! adaptive controls that react to health, and the process probes they read.

pub mod adaptive;
pub mod health;
pub mod metrics;
pub mod system;

pub use adaptive::{AdaptiveControls, AdjustedRateLimit};
pub use health::{HealthEvaluator, HealthReport, HealthStatus};
pub use metrics::{MetricSample, MetricsStore, NewSample};
pub use system::{ConnectionGauge, ProcessProbe, StaticGauge, SysinfoProbe};
