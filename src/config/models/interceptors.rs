//! Request interceptor configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Interceptor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorConfig {
    /// Per-request time budget
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Minimum body size that is signalled for compression
    #[serde(default = "default_compression_threshold")]
    pub compression_threshold_bytes: usize,
    /// Pagination defaults injected into GET requests
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            compression_threshold_bytes: default_compression_threshold(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// Pagination defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_page_limit")]
    pub max_limit: u32,
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
            default_sort: default_sort(),
        }
    }
}
