//! Health-scaled rate-limit ceiling

use crate::monitoring::health::HealthStatus;
use serde::Serialize;

/// Scale `base` by health: half when critical, three quarters when warning
pub fn adjusted_limit(base: u32, status: HealthStatus) -> u32 {
    match status {
        HealthStatus::Critical => (base as f64 * 0.5).floor() as u32,
        HealthStatus::Warning => (base as f64 * 0.75).floor() as u32,
        HealthStatus::Healthy => base,
    }
}

/// Request extension read by a downstream rate limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedRateLimit {
    pub limit: u32,
    pub base: u32,
    pub status: HealthStatus,
}

impl AdjustedRateLimit {
    pub fn new(base: u32, status: HealthStatus) -> Self {
        Self {
            limit: adjusted_limit(base, status),
            base,
            status,
        }
    }
}
