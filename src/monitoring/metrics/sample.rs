//! Sample types stored by the metrics recorder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of a completed request.
///
/// Samples are immutable once recorded; the store hands them out behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// When the sample was recorded
    pub timestamp: DateTime<Utc>,
    /// Route template or raw path
    pub endpoint: String,
    /// HTTP method
    pub method: String,
    /// Wall-clock duration from request start to response
    pub response_time_ms: u64,
    /// Response status
    pub status_code: u16,
    /// Process memory at response time
    pub memory_used_bytes: u64,
    /// Database calls made while serving the request
    pub db_query_count: u32,
    /// Time spent in those calls
    pub db_query_time_ms: u64,
    /// Always zero; per-request hit rates are not tracked
    pub cache_hit_rate: f64,
}

/// Input to [`MetricsStore::record`](super::MetricsStore::record); the store
/// stamps the timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSample {
    pub endpoint: String,
    pub method: String,
    pub response_time_ms: u64,
    pub status_code: u16,
    pub memory_used_bytes: u64,
    pub db_query_count: u32,
    pub db_query_time_ms: u64,
}

impl NewSample {
    /// Shortcut for a sample with only the request line and timing filled in
    pub fn new(
        endpoint: impl Into<String>,
        method: impl Into<String>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            response_time_ms,
            status_code: 200,
            ..Default::default()
        }
    }

    /// Set the response status
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Set the database counters
    pub fn with_queries(mut self, count: u32, time_ms: u64) -> Self {
        self.db_query_count = count;
        self.db_query_time_ms = time_ms;
        self
    }

    /// Set the memory snapshot
    pub fn with_memory(mut self, bytes: u64) -> Self {
        self.memory_used_bytes = bytes;
        self
    }

    pub(super) fn stamp(self, timestamp: DateTime<Utc>) -> MetricSample {
        MetricSample {
            timestamp,
            endpoint: self.endpoint,
            method: self.method,
            response_time_ms: self.response_time_ms,
            status_code: self.status_code,
            memory_used_bytes: self.memory_used_bytes,
            db_query_count: self.db_query_count,
            db_query_time_ms: self.db_query_time_ms,
            cache_hit_rate: 0.0,
        }
    }
}

/// Aggregate view over the buffer, served by `/performance/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Samples currently buffered
    pub total_samples: usize,
    /// Samples recorded since startup, evicted ones included
    pub total_recorded: u64,
    /// Mean response time over the buffer
    pub average_response_time_ms: f64,
    /// Sample counts keyed by status class
    pub status_classes: std::collections::BTreeMap<String, u64>,
    /// Endpoints ordered by descending average response time
    pub slowest_endpoints: Vec<EndpointSummary>,
}

/// Per-endpoint aggregate inside a [`MetricsSummary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    pub method: String,
    pub endpoint: String,
    pub count: u64,
    pub average_ms: f64,
    pub max_ms: u64,
}
