//! Health evaluation over the sample buffer and process readings

use super::types::*;
use crate::config::HealthThresholds;
use crate::monitoring::metrics::{MetricsStore, calculate_average, index_percentile};
use crate::monitoring::system::{ConnectionGauge, ProcessProbe};
use crate::storage::CacheStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Derives a [`HealthReport`] on demand
#[derive(Clone)]
pub struct HealthEvaluator {
    metrics: Arc<MetricsStore>,
    probe: Arc<dyn ProcessProbe>,
    gauge: Arc<dyn ConnectionGauge>,
    cache: Option<Arc<dyn CacheStore>>,
    thresholds: HealthThresholds,
}

impl std::fmt::Debug for HealthEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthEvaluator")
            .field("samples", &self.metrics.len())
            .field("cache", &self.cache.as_ref().map(|c| c.backend_name()))
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl HealthEvaluator {
    pub fn new(
        metrics: Arc<MetricsStore>,
        probe: Arc<dyn ProcessProbe>,
        gauge: Arc<dyn ConnectionGauge>,
        cache: Option<Arc<dyn CacheStore>>,
        thresholds: HealthThresholds,
    ) -> Self {
        Self {
            metrics,
            probe,
            gauge,
            cache,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Produce a fresh report.
    ///
    /// Database and cache gathering failures are logged and read as zeros, so
    /// evaluation itself never fails.
    pub async fn evaluate(&self) -> HealthReport {
        let metrics = HealthMetrics {
            memory: self.probe.memory().into(),
            cpu: self.probe.cpu(),
            database: self.database_metrics(),
            cache: self.cache_metrics().await,
            response_time: self.response_time_metrics(),
        };
        let (status, alerts) = derive_status(&metrics, &self.thresholds);
        debug!(status = %status, alerts = alerts.len(), "Health evaluated");

        HealthReport {
            status,
            timestamp: Utc::now(),
            metrics,
            alerts,
        }
    }

    fn database_metrics(&self) -> DatabaseMetrics {
        let connection_count = match self.gauge.active_connections() {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to read database connection count: {}", e);
                return DatabaseMetrics::default();
            }
        };

        let query_times: Vec<u64> = self
            .metrics
            .recent(self.thresholds.db_window)
            .iter()
            .map(|s| s.db_query_time_ms)
            .filter(|t| *t > 0)
            .collect();
        let slow_queries = query_times
            .iter()
            .filter(|t| **t > self.thresholds.slow_query_ms)
            .count();

        DatabaseMetrics {
            connection_count,
            average_query_time: calculate_average(&query_times),
            slow_queries,
        }
    }

    async fn cache_metrics(&self) -> CacheMetrics {
        let Some(cache) = &self.cache else {
            return CacheMetrics::default();
        };
        match cache.stats().await {
            Ok(stats) => CacheMetrics {
                hit_rate: stats.hit_rate(),
                memory_usage: 0,
            },
            Err(e) => {
                warn!("Failed to read cache statistics: {}", e);
                CacheMetrics::default()
            }
        }
    }

    fn response_time_metrics(&self) -> ResponseTimeMetrics {
        let mut times: Vec<u64> = self
            .metrics
            .recent(self.thresholds.response_window)
            .iter()
            .map(|s| s.response_time_ms)
            .collect();
        times.sort_unstable();

        ResponseTimeMetrics {
            average: calculate_average(&times),
            p95: index_percentile(&times, 0.95),
            p99: index_percentile(&times, 0.99),
        }
    }
}

/// Status and alerts for a set of measurements.
///
/// Rules only ever escalate; alerts come out in memory, response-time,
/// database, cache order.
pub fn derive_status(
    metrics: &HealthMetrics,
    thresholds: &HealthThresholds,
) -> (HealthStatus, Vec<String>) {
    let mut status = HealthStatus::Healthy;
    let mut alerts = Vec::new();

    if metrics.memory.percentage > thresholds.memory_critical_percent {
        status = status.escalate(HealthStatus::Critical);
        alerts.push(ALERT_MEMORY_HIGH.to_string());
    } else if metrics.memory.percentage > thresholds.memory_warning_percent {
        status = status.escalate(HealthStatus::Warning);
        alerts.push(ALERT_MEMORY_ELEVATED.to_string());
    }

    if metrics.response_time.p95 as f64 > thresholds.p95_warning_ms {
        status = status.escalate(HealthStatus::Warning);
        alerts.push(ALERT_SLOW_RESPONSES.to_string());
    }

    if metrics.database.average_query_time > thresholds.db_average_warning_ms {
        status = status.escalate(HealthStatus::Warning);
        alerts.push(ALERT_SLOW_QUERIES.to_string());
    }

    // Advisory only
    if metrics.cache.hit_rate < thresholds.cache_hit_rate_min {
        alerts.push(ALERT_LOW_CACHE_HIT_RATE.to_string());
    }

    (status, alerts)
}
