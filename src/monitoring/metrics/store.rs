//! The bounded sample store behind the metrics recorder

use super::alerts::{AlertSink, LogAlertSink};
use super::bounded::BoundedPush;
use super::helpers::{calculate_average, status_class};
use super::sample::{EndpointSummary, MetricSample, MetricsSummary, NewSample};
use crate::config::PerformanceConfig;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Process-local ring buffer of request samples.
///
/// Every read and write takes the lock exactly once, so callers on different
/// workers never observe a half-applied insertion or truncation.
#[derive(Debug)]
pub struct MetricsStore {
    samples: RwLock<VecDeque<Arc<MetricSample>>>,
    capacity: usize,
    warn_threshold_ms: u64,
    alert_threshold_ms: u64,
    alert_sink: Arc<dyn AlertSink>,
    total_recorded: AtomicU64,
}

impl MetricsStore {
    /// Create a store sized and thresholded from config
    pub fn new(config: &PerformanceConfig) -> Self {
        Self {
            samples: RwLock::new(VecDeque::with_capacity(config.buffer_capacity)),
            capacity: config.buffer_capacity,
            warn_threshold_ms: config.slow_request_warn_ms,
            alert_threshold_ms: config.slow_request_alert_ms,
            alert_sink: Arc::new(LogAlertSink),
            total_recorded: AtomicU64::new(0),
        }
    }

    /// Create a store with default thresholds and the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(&PerformanceConfig {
            buffer_capacity: capacity,
            ..Default::default()
        })
    }

    /// Replace the slow-request alert sink
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = sink;
        self
    }

    /// Stamp and append a sample, evicting the oldest beyond capacity
    pub fn record(&self, sample: NewSample) -> Arc<MetricSample> {
        let sample = Arc::new(sample.stamp(Utc::now()));
        self.samples
            .write()
            .push_bounded(Arc::clone(&sample), self.capacity);
        self.total_recorded.fetch_add(1, Ordering::Relaxed);

        if sample.response_time_ms > self.warn_threshold_ms {
            warn!(
                endpoint = %sample.endpoint,
                method = %sample.method,
                response_time_ms = sample.response_time_ms,
                "Slow request detected"
            );
        }
        if sample.response_time_ms > self.alert_threshold_ms {
            if let Err(e) = self.alert_sink.slow_request(&sample) {
                warn!("Failed to deliver slow request alert: {}", e);
            }
        }

        sample
    }

    /// All buffered samples, oldest first
    pub fn snapshot(&self) -> Vec<Arc<MetricSample>> {
        self.samples.read().iter().cloned().collect()
    }

    /// The last `n` samples, oldest first
    pub fn recent(&self, n: usize) -> Vec<Arc<MetricSample>> {
        let samples = self.samples.read();
        let skip = samples.len().saturating_sub(n);
        samples.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples recorded since startup, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded.load(Ordering::Relaxed)
    }

    /// Keep the last `keep` samples and release spare buffer memory.
    ///
    /// Returns the number of samples dropped.
    pub fn truncate_to(&self, keep: usize) -> usize {
        let mut samples = self.samples.write();
        let removed = samples.retain_last(keep);
        samples.shrink_to_fit();
        removed
    }

    /// Aggregate the buffer; `top` bounds the slowest-endpoint list
    pub fn summary(&self, top: usize) -> MetricsSummary {
        let samples = self.snapshot();
        let times: Vec<u64> = samples.iter().map(|s| s.response_time_ms).collect();

        let mut status_classes = BTreeMap::new();
        let mut per_endpoint: HashMap<(&str, &str), (u64, u64, u64)> = HashMap::new();
        for sample in &samples {
            *status_classes
                .entry(status_class(sample.status_code))
                .or_insert(0) += 1;
            let entry = per_endpoint
                .entry((sample.method.as_str(), sample.endpoint.as_str()))
                .or_insert((0, 0, 0));
            entry.0 += 1;
            entry.1 += sample.response_time_ms;
            entry.2 = entry.2.max(sample.response_time_ms);
        }

        let mut slowest_endpoints: Vec<EndpointSummary> = per_endpoint
            .into_iter()
            .map(|((method, endpoint), (count, total, max_ms))| EndpointSummary {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                count,
                average_ms: total as f64 / count as f64,
                max_ms,
            })
            .collect();
        slowest_endpoints.sort_by(|a, b| {
            b.average_ms
                .total_cmp(&a.average_ms)
                .then_with(|| a.endpoint.cmp(&b.endpoint))
        });
        slowest_endpoints.truncate(top);

        MetricsSummary {
            total_samples: samples.len(),
            total_recorded: self.total_recorded(),
            average_response_time_ms: calculate_average(&times),
            status_classes,
            slowest_endpoints,
        }
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new(&PerformanceConfig::default())
    }
}
