//! HTTP middleware implementations
//!
//! Outer to inner, as mounted by the server:
//! - Timing (metrics sample, `X-Response-Time`)
//! - Query counting (request-scoped [`QueryTracker`])
//! - Timeout (408)
//! - Adaptive control (health-scaled rate limit, optimisers)
//! - Compression signalling
//! - Pagination defaults
//! - Response cache
//! - Response shaping

mod adaptive;
mod cache;
mod compression;
mod helpers;
mod pagination;
mod query_counter;
mod shaping;
mod timeout;
mod timing;


// Re-export all middleware
pub use adaptive::{AdaptiveControlMiddleware, AdaptiveControlMiddlewareService};
pub use cache::{ResponseCacheMiddleware, ResponseCacheMiddlewareService};
pub use compression::{CompressionSignalMiddleware, CompressionSignalMiddlewareService};
pub use helpers::{
    X_CACHE, X_COMPRESSION_HINT, X_MEMORY_USAGE, X_RESPONSE_TIME, accepts_gzip, bearer_token,
};
pub use pagination::{
    PaginationDefaultsMiddleware, PaginationDefaultsMiddlewareService, apply_pagination_defaults,
};
pub use query_counter::{
    InstrumentedClient, QueryCountingMiddleware, QueryCountingMiddlewareService, QueryTracker,
};
pub use shaping::{
    ResponseShapingMiddleware, ResponseShapingMiddlewareService, project_fields,
    requested_fields, strip_nulls,
};
pub use timeout::{TimeoutMiddleware, TimeoutMiddlewareService};
pub use timing::{TimingMiddleware, TimingMiddlewareService};
