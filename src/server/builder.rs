//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function used by the gateway binary.

use crate::config::Config;
use crate::server::server::{HttpServer, RouteConfig};
use crate::utils::error::{PerfError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    routes: Option<RouteConfig>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Mount application routes behind the interceptor chain
    pub fn with_routes(mut self, routes: RouteConfig) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| PerfError::config("Configuration is required"))?;

        let server = HttpServer::new(&config).await?;
        Ok(match self.routes {
            Some(routes) => server.with_routes(routes),
            None => server,
        })
    }
}

/// Load configuration for the gateway.
///
/// Reads `path` if it exists (defaults otherwise), then applies `PERF_*`
/// environment overrides.
pub async fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        info!("Loading configuration file: {}", path.display());
        Config::from_file(path).await?
    } else {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        Config::default()
    };
    config.apply_env_overrides()?;
    Ok(config)
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting salon performance gateway");

    let server = ServerBuilder::new().with_config(config).build().await?;
    info!(
        "Server starting at: http://{}",
        server.config().address()
    );
    info!("   GET    /health, /healthz - Health report");
    info!("   GET    /performance/stats - Metrics summary");
    info!("   DELETE /performance/cache - Invalidate cached responses");

    server.start().await
}
