//! Common test utilities for salon-perf
//!
//! - Application state over static probes and the in-process cache
//! - Sample salon routes mounted behind the interceptor chain
//! - Temporary YAML config files

pub mod fixtures;

pub use fixtures::{salon_routes, test_state, write_config};
