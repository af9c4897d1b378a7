//! Configuration management for the performance layer
//!
//! This module handles loading, validation, and management of all configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PerfError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub interceptors: InterceptorConfig,
    #[serde(default)]
    pub outbound: OutboundConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PerfError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| PerfError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    /// Override selected fields from `PERF_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("PERF_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("PERF_PORT")? {
            self.server.port = port;
        }
        if let Some(dev_mode) = parse_env("PERF_DEV_MODE")? {
            self.server.dev_mode = dev_mode;
        }
        if let Some(timeout) = parse_env("PERF_REQUEST_TIMEOUT_MS")? {
            self.interceptors.request_timeout_ms = timeout;
        }
        if let Some(limit) = parse_env("PERF_BASE_RATE_LIMIT")? {
            self.performance.adaptive.base_rate_limit = limit;
        }
        if let Ok(url) = std::env::var("PERF_REDIS_URL") {
            self.cache.url = url;
            self.cache.enabled = true;
        }
        if let Some(enabled) = parse_env("PERF_CACHE_ENABLED")? {
            self.cache.enabled = enabled;
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| PerfError::Config(format!("Server config error: {}", e)))?;

        self.performance
            .validate()
            .map_err(|e| PerfError::Config(format!("Performance config error: {}", e)))?;

        self.cache
            .validate()
            .map_err(|e| PerfError::Config(format!("Cache config error: {}", e)))?;

        self.interceptors
            .validate()
            .map_err(|e| PerfError::Config(format!("Interceptor config error: {}", e)))?;

        self.outbound
            .validate()
            .map_err(|e| PerfError::Config(format!("Outbound config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PerfError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| PerfError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}
