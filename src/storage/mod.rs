//! Cache stores backing the response cache and the health evaluator
//!
//! A store is optional: every caller holds an `Option<Arc<dyn CacheStore>>`
//! and treats `None` as "no cache configured".

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use crate::config::{CacheBackendKind, CacheConfig};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub use memory::MemoryStore;

/// Keyspace counters reported by a cache server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheServerStats {
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
}

impl CacheServerStats {
    /// Hit rate in percent, 0 when nothing has been looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.keyspace_hits + self.keyspace_misses;
        if total == 0 {
            0.0
        } else {
            self.keyspace_hits as f64 / total as f64 * 100.0
        }
    }
}

/// Operations the performance layer needs from a cache server
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `SETEX key ttl value`
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// `KEYS pattern` (glob syntax)
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// `DEL keys...`, returns the number of removed keys
    async fn delete_many(&self, keys: &[String]) -> Result<u64>;

    /// `INFO stats` hit/miss counters
    async fn stats(&self) -> Result<CacheServerStats>;
}

/// Connect the configured cache store.
///
/// Returns `None` when caching is disabled or the store cannot be reached;
/// the rest of the layer degrades to no-ops in that case.
pub async fn connect(config: &CacheConfig) -> Option<Arc<dyn CacheStore>> {
    if !config.enabled {
        info!("Response cache disabled");
        return None;
    }

    match config.backend {
        CacheBackendKind::Memory => {
            info!(max_entries = config.max_entries, "Using in-process cache store");
            Some(Arc::new(MemoryStore::new(config.max_entries)))
        }
        #[cfg(feature = "redis")]
        CacheBackendKind::Redis => match redis::RedisPool::new(&config.url).await {
            Ok(pool) => Some(Arc::new(pool)),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, continuing without cache");
                None
            }
        },
        #[cfg(not(feature = "redis"))]
        CacheBackendKind::Redis => {
            warn!("Redis backend requested but the `redis` feature is disabled");
            None
        }
    }
}

/// Extract `keyspace_hits` / `keyspace_misses` from `INFO stats` output
pub fn parse_keyspace_stats(info: &str) -> CacheServerStats {
    let mut stats = CacheServerStats::default();

    for line in info.lines() {
        let Some((field, value)) = line.trim().split_once(':') else {
            continue;
        };
        let parsed = value.trim().parse::<u64>().unwrap_or(0);
        match field {
            "keyspace_hits" => stats.keyspace_hits = parsed,
            "keyspace_misses" => stats.keyspace_misses = parsed,
            _ => {}
        }
    }

    stats
}

/// Redis-style glob match supporting `*` and `?`
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            resume = t;
            p += 1;
        } else if let Some(star_pos) = star {
            p = star_pos + 1;
            resume += 1;
            t = resume;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}
