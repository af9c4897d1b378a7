//! Application state shared across HTTP handlers and middleware

use crate::config::Config;
use crate::monitoring::{
    AdaptiveControls, ConnectionGauge, HealthEvaluator, MetricsStore, ProcessProbe, StaticGauge,
    SysinfoProbe,
};
use crate::services::CacheService;
use crate::storage::{self, CacheStore};
use crate::utils::error::Result;
use crate::utils::net::OutboundClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// HTTP server state shared across handlers
///
/// Every field is cheap to clone; middleware read it through
/// `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Configuration (shared read-only)
    pub config: Arc<Config>,
    /// Sample buffer fed by the timing middleware
    pub metrics: Arc<MetricsStore>,
    /// Health evaluator over the sample buffer
    pub evaluator: Arc<HealthEvaluator>,
    /// Rate-limit scaling and optimisers
    pub adaptive: Arc<AdaptiveControls>,
    /// Response cache
    pub cache: CacheService,
    /// Process memory and CPU readings
    pub probe: Arc<dyn ProcessProbe>,
    /// Policy-gated outbound HTTP client
    pub outbound: Arc<OutboundClient>,
    started_at: Instant,
}

impl AppState {
    /// Build state from config, connecting the cache store if enabled
    pub async fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let store = storage::connect(&config.cache).await;
        let probe: Arc<dyn ProcessProbe> =
            Arc::new(SysinfoProbe::new(config.performance.memory_limit_bytes));
        let gauge: Arc<dyn ConnectionGauge> = Arc::new(StaticGauge(
            config.performance.adaptive.static_connection_count,
        ));

        Self::with_components(config, probe, gauge, store)
    }

    /// Build state from explicit components
    pub fn with_components(
        config: Config,
        probe: Arc<dyn ProcessProbe>,
        gauge: Arc<dyn ConnectionGauge>,
        store: Option<Arc<dyn CacheStore>>,
    ) -> Result<Self> {
        let metrics = Arc::new(MetricsStore::new(&config.performance));
        let evaluator = Arc::new(HealthEvaluator::new(
            Arc::clone(&metrics),
            Arc::clone(&probe),
            Arc::clone(&gauge),
            store.clone(),
            config.performance.thresholds.clone(),
        ));
        let adaptive = Arc::new(AdaptiveControls::new(
            &config.performance,
            Arc::clone(&metrics),
            Arc::clone(&probe),
            gauge,
        ));
        let cache = CacheService::new(store, &config.cache);
        let outbound = Arc::new(OutboundClient::from_config(&config.outbound)?);

        info!(
            cache = cache.store().map(|s| s.backend_name()).unwrap_or("none"),
            buffer_capacity = metrics.capacity(),
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            metrics,
            evaluator,
            adaptive,
            cache,
            probe,
            outbound,
            started_at: Instant::now(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Time since the state was built
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
