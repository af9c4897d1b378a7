//! Utility modules
//!
//! - **error**: error type and HTTP error envelope
//! - **logging**: tracing subscriber setup
//! - **net**: outbound HTTP client with an allow/deny/mock policy

pub mod error;
pub mod logging;
pub mod net;

pub use error::{PerfError, Result};
