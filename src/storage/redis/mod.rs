//! Redis cache store
//!
//! - `pool` - Connection management and health checks
//! - `cache` - `CacheStore` operations (get, setex, keys, del, info)
//! - `tests` - Module tests

mod cache;
mod pool;

pub use pool::RedisPool;
