//! Sample-buffer trimming under memory pressure

use crate::monitoring::metrics::MetricsStore;
use crate::monitoring::system::ProcessProbe;
use std::sync::Arc;
use tracing::info;

/// Outcome of one [`MemoryOptimizer::run`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemoryAction {
    /// Memory below the pressure threshold
    Skipped { percentage: f64 },
    /// Buffer truncated; `removed` samples released
    Trimmed { percentage: f64, removed: usize },
}

/// Trims the sample buffer when live process memory crosses a threshold
#[derive(Clone)]
pub struct MemoryOptimizer {
    probe: Arc<dyn ProcessProbe>,
    metrics: Arc<MetricsStore>,
    pressure_percent: f64,
    retain: usize,
}

impl MemoryOptimizer {
    pub fn new(
        probe: Arc<dyn ProcessProbe>,
        metrics: Arc<MetricsStore>,
        pressure_percent: f64,
        retain: usize,
    ) -> Self {
        Self {
            probe,
            metrics,
            pressure_percent,
            retain,
        }
    }

    /// Read live memory and trim the buffer to its newest samples if needed
    pub fn run(&self) -> MemoryAction {
        let percentage = self.probe.memory().percentage();
        if percentage <= self.pressure_percent {
            return MemoryAction::Skipped { percentage };
        }

        let removed = self.metrics.truncate_to(self.retain);
        info!(
            memory_percent = percentage,
            removed, "Trimmed metrics buffer under memory pressure"
        );
        MemoryAction::Trimmed {
            percentage,
            removed,
        }
    }
}
