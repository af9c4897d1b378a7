//! `CacheStore` implementation over Redis commands

use super::pool::RedisPool;
use crate::storage::{CacheServerStats, CacheStore, parse_keyspace_stats};
use crate::utils::error::{PerfError, Result};
use async_trait::async_trait;
use redis::AsyncCommands;

#[async_trait]
impl CacheStore for RedisPool {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection();
        let value: Option<String> = conn.get(key).await.map_err(PerfError::Redis)?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.connection();
        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(PerfError::Redis)?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection();
        let keys: Vec<String> = conn.keys(pattern).await.map_err(PerfError::Redis)?;
        Ok(keys)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection();
        let removed: u64 = conn.del(keys).await.map_err(PerfError::Redis)?;
        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheServerStats> {
        let mut conn = self.connection();
        let info: String = redis::cmd("INFO")
            .arg("stats")
            .query_async(&mut conn)
            .await
            .map_err(PerfError::Redis)?;
        Ok(parse_keyspace_stats(&info))
    }
}
