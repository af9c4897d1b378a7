//! Outbound HTTP policy configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Outbound HTTP policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundConfig {
    /// What happens to calls matching `patterns`
    #[serde(default)]
    pub mode: OutboundMode,
    /// URL regular expressions the mode applies to
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Body returned for mocked calls
    #[serde(default = "default_mock_response")]
    pub mock_response: serde_json::Value,
    /// Request timeout in seconds
    #[serde(default = "default_outbound_timeout")]
    pub timeout_secs: u64,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            mode: OutboundMode::default(),
            patterns: Vec::new(),
            mock_response: default_mock_response(),
            timeout_secs: default_outbound_timeout(),
        }
    }
}

/// Policy applied to matching outbound calls
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutboundMode {
    /// Everything goes through
    #[default]
    Allow,
    /// Matching calls fail without touching the network
    Deny,
    /// Matching calls return `mock_response`
    Mock,
}

fn default_mock_response() -> serde_json::Value {
    serde_json::json!({ "mocked": true })
}
