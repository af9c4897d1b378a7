//! Response cache service
//!
//! Wraps an optional [`CacheStore`]. Every operation degrades to a no-op when
//! no store is configured, and store failures are logged and swallowed.

use crate::config::CacheConfig;
use crate::storage::{CacheServerStats, CacheStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key-value cache for serialized responses
#[derive(Debug, Clone)]
pub struct CacheService {
    store: Option<Arc<dyn CacheStore>>,
    key_prefix: String,
    default_ttl_secs: u64,
}

impl CacheService {
    pub fn new(store: Option<Arc<dyn CacheStore>>, config: &CacheConfig) -> Self {
        Self {
            store,
            key_prefix: config.key_prefix.clone(),
            default_ttl_secs: config.default_ttl_secs,
        }
    }

    /// A service with no backing store
    pub fn disabled() -> Self {
        Self::new(None, &CacheConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Serialize `data` as JSON and store it under `key`
    pub async fn cache_data<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        ttl_secs: Option<u64>,
    ) {
        match serde_json::to_string(data) {
            Ok(body) => self.cache_raw(key, &body, ttl_secs).await,
            Err(e) => warn!(key, "Failed to serialize cache entry: {}", e),
        }
    }

    /// Store an already serialized body under `key`
    pub async fn cache_raw(&self, key: &str, body: &str, ttl_secs: Option<u64>) {
        let Some(store) = &self.store else {
            return;
        };
        let ttl = ttl_secs.unwrap_or(self.default_ttl_secs);
        match store.set_ex(&self.full_key(key), body, ttl).await {
            Ok(()) => debug!(key, ttl, "Cached response"),
            Err(e) => warn!(key, "Cache write failed: {}", e),
        }
    }

    /// Fetch and deserialize the entry under `key`
    pub async fn get_cached_data<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let body = self.get_raw(key).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Discarding undecodable cache entry: {}", e);
                None
            }
        }
    }

    /// Fetch the raw body under `key`
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        let store = self.store.as_ref()?;
        match store.get(&self.full_key(key)).await {
            Ok(body) => body,
            Err(e) => {
                warn!(key, "Cache read failed: {}", e);
                None
            }
        }
    }

    /// Delete every entry whose key matches the glob `pattern`.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate_cache(&self, pattern: &str) -> u64 {
        let Some(store) = &self.store else {
            return 0;
        };
        let pattern = self.full_key(pattern);
        let keys = match store.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(pattern, "Cache key scan failed: {}", e);
                return 0;
            }
        };
        if keys.is_empty() {
            return 0;
        }
        match store.delete_many(&keys).await {
            Ok(removed) => {
                debug!(pattern, removed, "Invalidated cache entries");
                removed
            }
            Err(e) => {
                warn!(pattern, "Cache invalidation failed: {}", e);
                0
            }
        }
    }

    /// Hit/miss counters of the backing store
    pub async fn server_stats(&self) -> Option<CacheServerStats> {
        let store = self.store.as_ref()?;
        match store.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Failed to read cache statistics: {}", e);
                None
            }
        }
    }
}

/// Cache key for a request: path, sorted query and a hash of the caller's token.
///
/// The path is kept byte-exact since resource identifiers can be
/// case-sensitive. Only the order of query pairs is normalized. Tokens are
/// hashed, never stored.
pub fn response_cache_key(path: &str, query: &str, bearer_token: Option<&str>) -> String {
    let mut normalized = path.to_string();

    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    if !pairs.is_empty() {
        pairs.sort();
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        normalized.push('?');
        normalized.push_str(&query);
    }

    if let Some(token) = bearer_token.filter(|t| !t.is_empty()) {
        normalized.push(':');
        normalized.push_str(&hex::encode(Sha256::digest(token.as_bytes())));
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use serde_json::{Value, json};

    fn memory_service() -> CacheService {
        CacheService::new(Some(Arc::new(MemoryStore::new(100))), &CacheConfig::default())
    }

    #[test]
    fn test_response_cache_key_normalization() {
        assert_eq!(
            response_cache_key("/api/customers", "page=2&limit=10", None),
            response_cache_key("/api/customers", "limit=10&page=2", None)
        );
        assert_eq!(response_cache_key("/", "", None), "/");
        assert_eq!(
            response_cache_key("/api/customers", "b=2&a=1", None),
            "/api/customers?a=1&b=2"
        );
    }

    #[test]
    fn test_response_cache_key_keeps_path_exact() {
        assert_ne!(
            response_cache_key("/api/customers/Ab12", "", None),
            response_cache_key("/api/customers/aB12", "", None)
        );
        assert_ne!(
            response_cache_key("/api/customers/", "", None),
            response_cache_key("/api/customers", "", None)
        );
        assert_eq!(
            response_cache_key("/API/Customers/", "", None),
            "/API/Customers/"
        );
    }

    #[test]
    fn test_response_cache_key_identity() {
        let alice = response_cache_key("/api/bookings", "", Some("token-a"));
        let bob = response_cache_key("/api/bookings", "", Some("token-b"));
        assert_ne!(alice, bob);
        assert!(!alice.contains("token-a"));
        assert_eq!(alice.len(), "/api/bookings:".len() + 64);
        assert_eq!(
            response_cache_key("/api/bookings", "", Some("")),
            "/api/bookings"
        );
    }

    #[tokio::test]
    async fn test_absent_store_is_noop() {
        let service = CacheService::disabled();
        service.cache_data("k", &json!({"a": 1}), None).await;
        assert_eq!(service.get_cached_data::<Value>("k").await, None);
        assert_eq!(service.invalidate_cache("*").await, 0);
        assert!(service.server_stats().await.is_none());
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_cache_round_trip_and_invalidate() {
        let service = memory_service();
        service
            .cache_data("/api/customers", &json!([{"id": 1}]), Some(60))
            .await;
        service.cache_data("/api/services", &json!([]), None).await;

        let cached: Option<Value> = service.get_cached_data("/api/customers").await;
        assert_eq!(cached, Some(json!([{"id": 1}])));

        assert_eq!(service.invalidate_cache("/api/cust*").await, 1);
        assert_eq!(service.get_cached_data::<Value>("/api/customers").await, None);
        assert!(service.get_raw("/api/services").await.is_some());
    }

    #[tokio::test]
    async fn test_undecodable_entry_reads_as_none() {
        let service = memory_service();
        service.cache_raw("k", "not json", None).await;
        assert_eq!(service.get_cached_data::<Value>("k").await, None);
        assert_eq!(service.get_raw("k").await.as_deref(), Some("not json"));
    }
}
