//! # salon-perf
//!
//! Response-performance instrumentation and adaptive throttling for the salon
//! management API.
//!
//! ## Features
//!
//! - **Request metrics**: bounded in-memory buffer of per-request samples with
//!   slow-request warnings and alerts
//! - **Health evaluation**: memory, response-time percentiles, database and
//!   cache aggregates rolled into a healthy/warning/critical status
//! - **Adaptive controls**: health-scaled rate limits, buffer trimming under
//!   memory pressure and sampled connection-pool checks
//! - **Interceptors**: timing, query counting, timeout, pagination defaults,
//!   compression signalling, response caching and response shaping
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use salon_perf::{Config, server::ServerBuilder};
//! use actix_web::{HttpResponse, web};
//!
//! fn routes(cfg: &mut web::ServiceConfig) {
//!     cfg.route("/api/services", web::get().to(HttpResponse::Ok));
//! }
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/perf.yaml").await?;
//!     let server = ServerBuilder::new()
//!         .with_config(config)
//!         .with_routes(routes)
//!         .build()
//!         .await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod monitoring;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use monitoring::{HealthReport, HealthStatus, MetricSample, MetricsStore, NewSample};
pub use server::{AppState, HttpServer, ServerBuilder};
pub use services::CacheService;
pub use utils::error::{PerfError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
