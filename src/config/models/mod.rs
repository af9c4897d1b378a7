//! Configuration data models
//!
//! This module defines all configuration structures used by the performance layer.

#![allow(missing_docs)]

pub mod cache;
pub mod interceptors;
pub mod outbound;
pub mod performance;
pub mod server;

// Re-export all configuration types
pub use cache::*;
pub use interceptors::*;
pub use outbound::*;
pub use performance::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

pub fn default_buffer_capacity() -> usize {
    1000
}

pub fn default_retain_on_pressure() -> usize {
    500
}

pub fn default_slow_request_warn_ms() -> u64 {
    5_000
}

pub fn default_slow_request_alert_ms() -> u64 {
    10_000
}

pub fn default_base_rate_limit() -> u32 {
    100
}

pub fn default_memory_pressure_percent() -> f64 {
    85.0
}

pub fn default_pool_sample_rate() -> f64 {
    0.01
}

pub fn default_pool_connection_threshold() -> u32 {
    50
}

pub fn default_static_connection_count() -> u32 {
    10
}

pub fn default_cache_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

pub fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

pub fn default_cache_key_prefix() -> String {
    "perf:cache:".to_string()
}

pub fn default_cache_max_entries() -> u64 {
    10_000
}

pub fn default_cache_skip_paths() -> Vec<String> {
    vec![
        "/health".to_string(),
        "/healthz".to_string(),
        "/performance".to_string(),
    ]
}

pub fn default_request_timeout_ms() -> u64 {
    30_000
}

pub fn default_compression_threshold() -> usize {
    1024
}

pub fn default_page_limit() -> u32 {
    20
}

pub fn default_max_page_limit() -> u32 {
    100
}

pub fn default_sort() -> String {
    "createdAt:desc".to_string()
}

pub fn default_outbound_timeout() -> u64 {
    10
}

pub fn default_true() -> bool {
    true
}
