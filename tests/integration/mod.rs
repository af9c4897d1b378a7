//! Integration tests for salon-perf
//!
//! These tests run the complete interceptor chain around sample salon
//! routes and load configuration the way the gateway binary does.

pub mod config_tests;
pub mod health_endpoint_tests;
pub mod interceptor_chain_tests;
