//! Sampled connection-pool check

use crate::monitoring::system::ConnectionGauge;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Outcome of one [`PoolOptimizer::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolAction {
    /// Active connections within bounds
    Idle { active: u32 },
    /// Connection count above the threshold; an adjustment was recorded
    Adjusted { active: u32 },
    /// The gauge could not be read
    Unavailable,
}

/// Watches the active connection count on a sampled fraction of requests
pub struct PoolOptimizer {
    gauge: Arc<dyn ConnectionGauge>,
    threshold: u32,
    sample_rate: f64,
    adjustments: AtomicU64,
}

impl PoolOptimizer {
    pub fn new(gauge: Arc<dyn ConnectionGauge>, threshold: u32, sample_rate: f64) -> Self {
        Self {
            gauge,
            threshold,
            sample_rate: sample_rate.clamp(0.0, 1.0),
            adjustments: AtomicU64::new(0),
        }
    }

    /// Run the check with the configured probability
    pub fn maybe_run(&self) -> Option<PoolAction> {
        if rand::thread_rng().gen_bool(self.sample_rate) {
            Some(self.run())
        } else {
            None
        }
    }

    /// Read the gauge and record an adjustment above the threshold
    pub fn run(&self) -> PoolAction {
        let active = match self.gauge.active_connections() {
            Ok(active) => active,
            Err(e) => {
                warn!("Connection pool check failed: {}", e);
                return PoolAction::Unavailable;
            }
        };

        if active > self.threshold {
            self.adjustments.fetch_add(1, Ordering::Relaxed);
            info!(
                active_connections = active,
                threshold = self.threshold,
                "Optimizing connection pool"
            );
            PoolAction::Adjusted { active }
        } else {
            PoolAction::Idle { active }
        }
    }

    /// Adjustments recorded since startup
    pub fn adjustments(&self) -> u64 {
        self.adjustments.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for PoolOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolOptimizer")
            .field("threshold", &self.threshold)
            .field("sample_rate", &self.sample_rate)
            .field("adjustments", &self.adjustments())
            .finish()
    }
}
