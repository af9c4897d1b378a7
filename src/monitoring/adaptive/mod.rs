//! Adaptive controls driven by the health report

mod memory;
mod pool;
mod rate_limit;


pub use memory::{MemoryAction, MemoryOptimizer};
pub use pool::{PoolAction, PoolOptimizer};
pub use rate_limit::{AdjustedRateLimit, adjusted_limit};

use crate::config::PerformanceConfig;
use crate::monitoring::metrics::MetricsStore;
use crate::monitoring::system::{ConnectionGauge, ProcessProbe};
use std::sync::Arc;

/// Rate-limit scaling plus both optimisers, as wired into the server
pub struct AdaptiveControls {
    pub enabled: bool,
    pub base_rate_limit: u32,
    pub memory: MemoryOptimizer,
    pub pool: PoolOptimizer,
}

impl AdaptiveControls {
    pub fn new(
        config: &PerformanceConfig,
        metrics: Arc<MetricsStore>,
        probe: Arc<dyn ProcessProbe>,
        gauge: Arc<dyn ConnectionGauge>,
    ) -> Self {
        let adaptive = &config.adaptive;
        Self {
            enabled: adaptive.enabled,
            base_rate_limit: adaptive.base_rate_limit,
            memory: MemoryOptimizer::new(
                probe,
                metrics,
                adaptive.memory_pressure_percent,
                config.retain_on_pressure,
            ),
            pool: PoolOptimizer::new(
                gauge,
                adaptive.pool_connection_threshold,
                adaptive.pool_check_sample_rate,
            ),
        }
    }
}
