//! Response cache configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable response caching
    #[serde(default)]
    pub enabled: bool,
    /// Backing store
    #[serde(default)]
    pub backend: CacheBackendKind,
    /// Connection URL for the redis backend
    #[serde(default = "default_cache_url")]
    pub url: String,
    /// TTL applied when a route does not supply one
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: u64,
    /// Prefix prepended to every response cache key
    #[serde(default = "default_cache_key_prefix")]
    pub key_prefix: String,
    /// Capacity of the in-process backend
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
    /// Path prefixes that are never cached
    #[serde(default = "default_cache_skip_paths")]
    pub skip_paths: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: CacheBackendKind::default(),
            url: default_cache_url(),
            default_ttl_secs: default_cache_ttl(),
            key_prefix: default_cache_key_prefix(),
            max_entries: default_cache_max_entries(),
            skip_paths: default_cache_skip_paths(),
        }
    }
}

impl CacheConfig {
    /// Whether responses under this path bypass the cache
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_paths.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Cache store backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    /// Redis server
    #[default]
    Redis,
    /// In-process store
    Memory,
}
