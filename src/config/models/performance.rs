//! Metrics buffer, health threshold and adaptive-control configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Performance instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Maximum number of samples kept in the ring buffer
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Samples kept when the memory optimiser trims the buffer
    #[serde(default = "default_retain_on_pressure")]
    pub retain_on_pressure: usize,
    /// Requests slower than this are logged as warnings
    #[serde(default = "default_slow_request_warn_ms")]
    pub slow_request_warn_ms: u64,
    /// Requests slower than this raise a slow-request alert
    #[serde(default = "default_slow_request_alert_ms")]
    pub slow_request_alert_ms: u64,
    /// Memory budget used as the denominator for memory percentage.
    /// Falls back to total system memory when unset.
    #[serde(default)]
    pub memory_limit_bytes: Option<u64>,
    /// Health thresholds
    #[serde(default)]
    pub thresholds: HealthThresholds,
    /// Adaptive controls
    #[serde(default)]
    pub adaptive: AdaptiveConfig,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            retain_on_pressure: default_retain_on_pressure(),
            slow_request_warn_ms: default_slow_request_warn_ms(),
            slow_request_alert_ms: default_slow_request_alert_ms(),
            memory_limit_bytes: None,
            thresholds: HealthThresholds::default(),
            adaptive: AdaptiveConfig::default(),
        }
    }
}

/// Thresholds used by the health evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub memory_critical_percent: f64,
    pub memory_warning_percent: f64,
    pub p95_warning_ms: f64,
    pub db_average_warning_ms: f64,
    pub slow_query_ms: u64,
    pub cache_hit_rate_min: f64,
    /// Number of recent samples used for the database aggregate
    pub db_window: usize,
    /// Number of recent samples used for the response-time aggregate
    pub response_window: usize,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            memory_critical_percent: 90.0,
            memory_warning_percent: 80.0,
            p95_warning_ms: 3000.0,
            db_average_warning_ms: 1000.0,
            slow_query_ms: 1000,
            cache_hit_rate_min: 80.0,
            db_window: 50,
            response_window: 100,
        }
    }
}

/// Adaptive control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Run adaptive controls on every request
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Rate limit before health scaling
    #[serde(default = "default_base_rate_limit")]
    pub base_rate_limit: u32,
    /// Memory percentage above which the sample buffer is trimmed
    #[serde(default = "default_memory_pressure_percent")]
    pub memory_pressure_percent: f64,
    /// Fraction of requests that run the connection-pool check
    #[serde(default = "default_pool_sample_rate")]
    pub pool_check_sample_rate: f64,
    /// Active connections above which the pool is adjusted
    #[serde(default = "default_pool_connection_threshold")]
    pub pool_connection_threshold: u32,
    /// Connection count reported by the static gauge
    #[serde(default = "default_static_connection_count")]
    pub static_connection_count: u32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_rate_limit: default_base_rate_limit(),
            memory_pressure_percent: default_memory_pressure_percent(),
            pool_check_sample_rate: default_pool_sample_rate(),
            pool_connection_threshold: default_pool_connection_threshold(),
            static_connection_count: default_static_connection_count(),
        }
    }
}
