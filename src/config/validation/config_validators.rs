//! Validators for each configuration section

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for PerformanceConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating performance configuration");

        if self.buffer_capacity == 0 {
            return Err("Buffer capacity must be greater than 0".to_string());
        }

        if self.retain_on_pressure > self.buffer_capacity {
            return Err(format!(
                "retain_on_pressure ({}) cannot exceed buffer_capacity ({})",
                self.retain_on_pressure, self.buffer_capacity
            ));
        }

        if self.slow_request_warn_ms > self.slow_request_alert_ms {
            return Err("slow_request_warn_ms must not exceed slow_request_alert_ms".to_string());
        }

        if self.memory_limit_bytes == Some(0) {
            return Err("memory_limit_bytes must be greater than 0 when set".to_string());
        }

        self.thresholds.validate()?;
        self.adaptive.validate()?;

        Ok(())
    }
}

impl Validate for HealthThresholds {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("memory_critical_percent", self.memory_critical_percent),
            ("memory_warning_percent", self.memory_warning_percent),
            ("cache_hit_rate_min", self.cache_hit_rate_min),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100", name));
            }
        }

        if self.memory_warning_percent > self.memory_critical_percent {
            return Err("memory_warning_percent cannot exceed memory_critical_percent".to_string());
        }

        if self.db_window == 0 || self.response_window == 0 {
            return Err("Aggregation windows must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for AdaptiveConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_rate_limit == 0 {
            return Err("base_rate_limit must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.pool_check_sample_rate) {
            return Err("pool_check_sample_rate must be between 0 and 1".to_string());
        }

        if !(0.0..=100.0).contains(&self.memory_pressure_percent) {
            return Err("memory_pressure_percent must be between 0 and 100".to_string());
        }

        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.default_ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        if self.key_prefix.is_empty() {
            return Err("Cache key prefix cannot be empty".to_string());
        }

        match self.backend {
            CacheBackendKind::Redis => {
                if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
                    return Err("Redis URL must start with redis:// or rediss://".to_string());
                }
            }
            CacheBackendKind::Memory => {
                if self.max_entries == 0 {
                    return Err("max_entries must be greater than 0".to_string());
                }
            }
        }

        Ok(())
    }
}

impl Validate for InterceptorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("Request timeout cannot be 0".to_string());
        }

        self.pagination.validate()
    }
}

impl Validate for PaginationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_limit == 0 {
            return Err("Default page limit must be greater than 0".to_string());
        }

        if self.default_limit > self.max_limit {
            return Err(format!(
                "Default page limit ({}) cannot exceed max limit ({})",
                self.default_limit, self.max_limit
            ));
        }

        if self.default_sort.is_empty() {
            return Err("Default sort cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for OutboundConfig {
    fn validate(&self) -> Result<(), String> {
        for pattern in &self.patterns {
            regex::Regex::new(pattern)
                .map_err(|e| format!("Invalid outbound pattern '{}': {}", pattern, e))?;
        }

        if self.timeout_secs == 0 {
            return Err("Outbound timeout cannot be 0".to_string());
        }

        Ok(())
    }
}
