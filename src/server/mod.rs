//! HTTP server implementation
//!
//! This module provides the HTTP server, its shared state, the interceptor
//! middleware and the health/performance routes.

pub mod builder;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
mod tests;

pub use builder::{ServerBuilder, load_config, run_server};
pub use server::{HttpServer, RouteConfig};
pub use state::AppState;
