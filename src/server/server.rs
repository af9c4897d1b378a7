//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and the interceptor chain
//! mounted around every route.

use crate::config::{Config, ServerConfig};
use crate::server::handlers::health_check;
use crate::server::middleware::{
    AdaptiveControlMiddleware, CompressionSignalMiddleware, PaginationDefaultsMiddleware,
    QueryCountingMiddleware, ResponseCacheMiddleware, ResponseShapingMiddleware,
    TimeoutMiddleware, TimingMiddleware,
};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{PerfError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, web};
use tracing::info;
use tracing_actix_web::TracingLogger;

/// Route registration hook for the application's own handlers
pub type RouteConfig = fn(&mut web::ServiceConfig);

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
    /// Application routes mounted behind the interceptor chain
    routes: RouteConfig,
}

impl HttpServer {
    /// Create a new HTTP server
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::from_config(config.clone()).await?;
        Ok(Self::with_state(state))
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.server.clone(),
            state,
            routes: |_| {},
        }
    }

    /// Mount application routes behind the interceptor chain
    pub fn with_routes(mut self, routes: RouteConfig) -> Self {
        self.routes = routes;
        self
    }

    /// Create the Actix-web application.
    ///
    /// Outer to inner: request tracing, timing, query counting, timeout,
    /// adaptive control, compression signalling, pagination defaults,
    /// response cache, response shaping.
    pub fn create_app(
        state: web::Data<AppState>,
        routes: RouteConfig,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let interceptors = state.config.interceptors.clone();

        App::new()
            .app_data(state)
            .route("/health", web::get().to(health_check))
            .route("/healthz", web::get().to(health_check))
            .configure(routes::performance::configure_routes)
            .configure(routes)
            .wrap(ResponseShapingMiddleware)
            .wrap(ResponseCacheMiddleware)
            .wrap(PaginationDefaultsMiddleware::new(interceptors.pagination))
            .wrap(CompressionSignalMiddleware::new(
                interceptors.compression_threshold_bytes,
            ))
            .wrap(AdaptiveControlMiddleware)
            .wrap(TimeoutMiddleware::from_millis(interceptors.request_timeout_ms))
            .wrap(QueryCountingMiddleware)
            .wrap(TimingMiddleware)
            .wrap(TracingLogger::default())
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let workers = self.config.worker_count();
        let routes = self.routes;

        info!("Starting HTTP server on {} with {} workers", bind_addr, workers);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone(), routes))
            .workers(workers)
            .bind(&bind_addr)
            .map_err(|e| PerfError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| PerfError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
