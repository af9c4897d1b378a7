//! Services module
//!
//! Services built on top of the storage layer

pub mod cache;

pub use cache::{CacheService, response_cache_key};
