//! Outbound HTTP client with an explicit allow/deny/mock policy
//!
//! The policy is injected through application state; nothing global is
//! patched.

use crate::config::{OutboundConfig, OutboundMode};
use crate::utils::error::{PerfError, Result};
use regex::RegexSet;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// What the policy does with one URL
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundDecision {
    /// Perform the call
    Forward,
    /// Refuse without network I/O
    Block,
    /// Answer with this body without network I/O
    Mock(Value),
}

/// URL patterns plus the mode applied to matches
#[derive(Debug, Clone)]
pub struct OutboundPolicy {
    mode: OutboundMode,
    patterns: RegexSet,
    mock_response: Value,
}

impl OutboundPolicy {
    pub fn new(mode: OutboundMode, patterns: &[String], mock_response: Value) -> Result<Self> {
        let patterns = RegexSet::new(patterns)
            .map_err(|e| PerfError::config(format!("Invalid outbound pattern: {}", e)))?;
        Ok(Self {
            mode,
            patterns,
            mock_response,
        })
    }

    pub fn from_config(config: &OutboundConfig) -> Result<Self> {
        Self::new(config.mode, &config.patterns, config.mock_response.clone())
    }

    /// Policy that forwards everything
    pub fn allow_all() -> Self {
        Self {
            mode: OutboundMode::Allow,
            patterns: RegexSet::empty(),
            mock_response: Value::Null,
        }
    }

    /// Decide what happens to a call to `url`
    pub fn decide(&self, url: &str) -> OutboundDecision {
        if !self.patterns.is_match(url) {
            return OutboundDecision::Forward;
        }
        match self.mode {
            OutboundMode::Allow => OutboundDecision::Forward,
            OutboundMode::Deny => OutboundDecision::Block,
            OutboundMode::Mock => OutboundDecision::Mock(self.mock_response.clone()),
        }
    }
}

/// `reqwest` client gated by an [`OutboundPolicy`]
#[derive(Debug, Clone)]
pub struct OutboundClient {
    client: reqwest::Client,
    policy: OutboundPolicy,
}

impl OutboundClient {
    pub fn new(policy: OutboundPolicy, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, policy })
    }

    pub fn from_config(config: &OutboundConfig) -> Result<Self> {
        Self::new(
            OutboundPolicy::from_config(config)?,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn policy(&self) -> &OutboundPolicy {
        &self.policy
    }

    /// GET `url` and decode the JSON body
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        match self.policy.decide(url) {
            OutboundDecision::Block => {
                Err(PerfError::outbound_blocked(format!("Outbound call to {} blocked", url)))
            }
            OutboundDecision::Mock(body) => {
                debug!(url, "Returning mocked outbound response");
                Ok(body)
            }
            OutboundDecision::Forward => {
                let response = self.client.get(url).send().await?.error_for_status()?;
                Ok(response.json().await?)
            }
        }
    }

    /// POST `body` as JSON to `url` and decode the JSON reply
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        match self.policy.decide(url) {
            OutboundDecision::Block => {
                Err(PerfError::outbound_blocked(format!("Outbound call to {} blocked", url)))
            }
            OutboundDecision::Mock(reply) => {
                debug!(url, "Returning mocked outbound response");
                Ok(reply)
            }
            OutboundDecision::Forward => {
                let response = self
                    .client
                    .post(url)
                    .json(body)
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(response.json().await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn policy(mode: OutboundMode) -> OutboundPolicy {
        OutboundPolicy::new(
            mode,
            &["api\\.line\\.me".to_string(), "graph\\.instagram\\.com".to_string()],
            json!({"mocked": true}),
        )
        .unwrap()
    }

    #[test]
    fn test_policy_decisions() {
        let deny = policy(OutboundMode::Deny);
        assert_eq!(deny.decide("https://api.line.me/v2/bot/message/push"), OutboundDecision::Block);
        assert_eq!(deny.decide("https://example.com/"), OutboundDecision::Forward);

        let mock = policy(OutboundMode::Mock);
        assert_eq!(
            mock.decide("https://graph.instagram.com/me"),
            OutboundDecision::Mock(json!({"mocked": true}))
        );

        let allow = policy(OutboundMode::Allow);
        assert_eq!(allow.decide("https://api.line.me/"), OutboundDecision::Forward);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err =
            OutboundPolicy::new(OutboundMode::Deny, &["(".to_string()], Value::Null).unwrap_err();
        assert!(matches!(err, PerfError::Config(_)));
    }

    #[tokio::test]
    async fn test_blocked_call_never_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(0)
            .mount(&server)
            .await;

        let policy = OutboundPolicy::new(
            OutboundMode::Deny,
            &[regex::escape(&server.uri())],
            Value::Null,
        )
        .unwrap();
        let client = OutboundClient::new(policy, Duration::from_secs(5)).unwrap();

        let err = client.get_json(&format!("{}/push", server.uri())).await.unwrap_err();
        assert!(matches!(err, PerfError::OutboundBlocked(_)));
    }

    #[tokio::test]
    async fn test_mocked_call_returns_configured_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let policy = OutboundPolicy::new(
            OutboundMode::Mock,
            &[regex::escape(&server.uri())],
            json!({"sent": false}),
        )
        .unwrap();
        let client = OutboundClient::new(policy, Duration::from_secs(5)).unwrap();

        let reply = client
            .post_json(&format!("{}/send", server.uri()), &json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(reply, json!({"sent": false}));
    }

    #[tokio::test]
    async fn test_forwarded_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OutboundClient::new(OutboundPolicy::allow_all(), Duration::from_secs(5)).unwrap();
        let body = client.get_json(&format!("{}/status", server.uri())).await.unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client =
            OutboundClient::new(OutboundPolicy::allow_all(), Duration::from_secs(5)).unwrap();
        let err = client.get_json(&format!("{}/boom", server.uri())).await.unwrap_err();
        assert!(matches!(err, PerfError::HttpClient(_)));
    }
}
