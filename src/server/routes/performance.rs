//! Performance inspection endpoints
//!
//! - `GET /performance/stats`: buffered metrics summary, cache counters and
//!   adaptive state
//! - `DELETE /performance/cache?pattern=`: invalidate cached responses

use crate::monitoring::metrics::MetricsSummary;
use crate::server::AppState;
use crate::storage::CacheServerStats;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Number of endpoints listed in the stats summary
const SLOWEST_ENDPOINTS: usize = 10;

/// Stats response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStatsResponse {
    pub uptime: f64,
    pub metrics: MetricsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheServerStats>,
    pub base_rate_limit: u32,
    pub pool_adjustments: u64,
}

/// Cache invalidation query
#[derive(Debug, Deserialize)]
pub struct InvalidateQuery {
    /// Glob over cache keys (without the prefix); everything when absent
    pub pattern: Option<String>,
}

/// Cache invalidation response
#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateResponse {
    pub pattern: String,
    pub removed: u64,
}

/// GET /performance/stats
pub async fn performance_stats(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(PerformanceStatsResponse {
        uptime: data.uptime().as_secs_f64(),
        metrics: data.metrics.summary(SLOWEST_ENDPOINTS),
        cache: data.cache.server_stats().await,
        base_rate_limit: data.adaptive.base_rate_limit,
        pool_adjustments: data.adaptive.pool.adjustments(),
    })
}

/// DELETE /performance/cache
pub async fn invalidate_cache(
    data: web::Data<AppState>,
    query: web::Query<InvalidateQuery>,
) -> HttpResponse {
    let pattern = query
        .into_inner()
        .pattern
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "*".to_string());
    let removed = data.cache.invalidate_cache(&pattern).await;
    info!(pattern = %pattern, removed, "Cache invalidation requested");

    HttpResponse::Ok().json(InvalidateResponse { pattern, removed })
}

/// Configure performance routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/performance")
            .route("/stats", web::get().to(performance_stats))
            .route("/cache", web::delete().to(invalidate_cache)),
    );
}
