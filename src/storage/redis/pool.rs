//! Redis connection management
//!
//! This module provides the shared multiplexed Redis connection.

use crate::utils::error::{PerfError, Result};
use redis::{Client, aio::MultiplexedConnection};
use tracing::{debug, info};

/// Redis connection pool backed by a multiplexed connection
#[derive(Clone)]
pub struct RedisPool {
    pub(super) connection: MultiplexedConnection,
    pub(super) url: String,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &Self::sanitize_url(&self.url))
            .finish()
    }
}

impl RedisPool {
    /// Connect to the Redis server at `url`
    pub async fn new(url: &str) -> Result<Self> {
        info!("Creating Redis connection pool");
        debug!("Redis URL: {}", Self::sanitize_url(url));

        let client = Client::open(url).map_err(PerfError::Redis)?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(PerfError::Redis)?;

        info!("Redis connection pool created successfully");
        Ok(Self {
            connection,
            url: url.to_string(),
        })
    }

    /// Get a handle on the shared connection
    pub(super) fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}
