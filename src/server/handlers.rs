//! HTTP route handlers
//!
//! This module provides the health endpoint served at `/health` and `/healthz`.

use crate::monitoring::health::{HealthReport, MemoryMetrics, ResponseTimeMetrics};
use crate::monitoring::HealthStatus;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Body of a successful health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthBody<'a> {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
    /// Seconds since startup
    uptime: f64,
    memory: &'a MemoryMetrics,
    response_time: &'a ResponseTimeMetrics,
    alerts: &'a [String],
}

fn health_body(report: &HealthReport, uptime: f64) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(HealthBody {
        status: report.status,
        timestamp: report.timestamp,
        uptime,
        memory: &report.metrics.memory,
        response_time: &report.metrics.response_time,
        alerts: &report.alerts,
    })?)
}

/// Health check endpoint handler
///
/// 200 for healthy and warning, 503 for critical or when the report cannot be
/// produced.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let report = state.evaluator.evaluate().await;

    match health_body(&report, state.uptime().as_secs_f64()) {
        Ok(body) if report.status.is_serving() => HttpResponse::Ok().json(body),
        Ok(body) => HttpResponse::ServiceUnavailable().json(body),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "error",
                "error": e.to_string(),
            }))
        }
    }
}
