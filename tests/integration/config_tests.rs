//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use crate::common::write_config;
    use salon_perf::PerfError;
    use salon_perf::config::{CacheBackendKind, Config, OutboundMode};
    use salon_perf::server::{AppState, load_config};
    use serde_json::json;
    use std::path::Path;

    const EXAMPLE: &str = include_str!("../../config/perf.example.yaml");

    /// The shipped example parses and matches the defaults
    #[test]
    fn test_example_config_matches_defaults() {
        let example = Config::from_yaml_str(EXAMPLE).unwrap();
        let defaults = Config::default();

        assert_eq!(example.server.port, defaults.server.port);
        assert_eq!(
            example.performance.buffer_capacity,
            defaults.performance.buffer_capacity
        );
        assert_eq!(example.performance.thresholds, defaults.performance.thresholds);
        assert_eq!(example.cache.skip_paths, defaults.cache.skip_paths);
        assert_eq!(
            example.interceptors.pagination.default_sort,
            defaults.interceptors.pagination.default_sort
        );
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let file = write_config(
            r#"
server:
  port: 9100
cache:
  enabled: true
  backend: memory
  max_entries: 50
outbound:
  mode: mock
  patterns: ["^https://sms\\."]
  mock_response: { delivered: true }
"#,
        );

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.cache.backend, CacheBackendKind::Memory);
        assert_eq!(config.outbound.mode, OutboundMode::Mock);
        assert_eq!(config.interceptors.request_timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/perf.yaml"))
            .await
            .unwrap();
        assert_eq!(config.server.port, Config::default().server.port);
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected() {
        let file = write_config(
            "interceptors:\n  pagination:\n    default_limit: 500\n    max_limit: 100\n",
        );
        let result = load_config(file.path()).await;
        assert!(matches!(result, Err(PerfError::Config(msg)) if msg.contains("Interceptor")));
    }

    /// State built from a loaded config wires the mock outbound policy
    #[tokio::test]
    async fn test_state_from_loaded_config() {
        let file = write_config(
            r#"
cache:
  enabled: true
  backend: memory
outbound:
  mode: mock
  patterns: ["^https://sms\\.example\\.com/"]
  mock_response: { delivered: true }
"#,
        );
        let config = load_config(file.path()).await.unwrap();
        let state = AppState::from_config(config).await.unwrap();

        assert!(state.cache.is_enabled());
        let reply = state
            .outbound
            .post_json("https://sms.example.com/send", &json!({"to": "+100"}))
            .await
            .unwrap();
        assert_eq!(reply, json!({"delivered": true}));
    }
}
