//! Health report types

use crate::monitoring::system::{CpuSnapshot, MemorySnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ALERT_MEMORY_HIGH: &str = "High memory usage detected";
pub const ALERT_MEMORY_ELEVATED: &str = "Memory usage is elevated";
pub const ALERT_SLOW_RESPONSES: &str = "Slow response times detected";
pub const ALERT_SLOW_QUERIES: &str = "Slow database queries detected";
pub const ALERT_LOW_CACHE_HIT_RATE: &str = "Low cache hit rate";

/// Three-level health status, ordered by severity
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Move to `other` if it is more severe; never downgrades
    pub fn escalate(self, other: HealthStatus) -> HealthStatus {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }

    /// Whether the health endpoint should answer 200
    pub fn is_serving(&self) -> bool {
        !matches!(self, HealthStatus::Critical)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory section of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetrics {
    pub used: u64,
    pub total: u64,
    pub percentage: f64,
}

impl From<MemorySnapshot> for MemoryMetrics {
    fn from(snapshot: MemorySnapshot) -> Self {
        Self {
            used: snapshot.used_bytes,
            total: snapshot.total_bytes,
            percentage: snapshot.percentage(),
        }
    }
}

/// Database section of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseMetrics {
    pub connection_count: u32,
    pub average_query_time: f64,
    pub slow_queries: usize,
}

/// Cache section of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    pub hit_rate: f64,
    pub memory_usage: u64,
}

/// Response-time section of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeMetrics {
    pub average: f64,
    pub p95: u64,
    pub p99: u64,
}

/// All measurements behind a status decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub memory: MemoryMetrics,
    pub cpu: CpuSnapshot,
    pub database: DatabaseMetrics,
    pub cache: CacheMetrics,
    pub response_time: ResponseTimeMetrics,
}

/// Point-in-time health judgment; never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub metrics: HealthMetrics,
    pub alerts: Vec<String>,
}
