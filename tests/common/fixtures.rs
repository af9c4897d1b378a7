//! Test fixtures and route factories

use actix_web::{HttpResponse, web};
use salon_perf::config::{CacheBackendKind, Config};
use salon_perf::monitoring::system::{StaticGauge, StaticProbe};
use salon_perf::server::AppState;
use salon_perf::server::middleware::{InstrumentedClient, QueryTracker};
use salon_perf::server::routes::ListQuery;
use salon_perf::storage::{CacheStore, MemoryStore};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Calls that reached the appointments handler
pub static APPOINTMENT_CALLS: AtomicUsize = AtomicUsize::new(0);

/// State with memory pinned at `memory_percent` and, when `cached`, an
/// in-process response cache
pub fn test_state(mut config: Config, memory_percent: u64, cached: bool) -> web::Data<AppState> {
    let store: Option<Arc<dyn CacheStore>> = if cached {
        config.cache.enabled = true;
        config.cache.backend = CacheBackendKind::Memory;
        Some(Arc::new(MemoryStore::new(config.cache.max_entries)))
    } else {
        None
    };

    let state = AppState::with_components(
        config,
        Arc::new(StaticProbe::with_memory(memory_percent, 100)),
        Arc::new(StaticGauge(10)),
        store,
    )
    .expect("test state");
    web::Data::new(state)
}

/// Stand-in database client
#[derive(Debug, Clone)]
pub struct FakeSalonDb;

impl FakeSalonDb {
    pub async fn find_clients(&self, limit: u32) -> Result<Vec<serde_json::Value>, String> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok((1..=limit.min(3))
            .map(|id| json!({"id": id, "name": format!("Client {}", id), "notes": null}))
            .collect())
    }
}

async fn list_clients(
    query: web::Query<ListQuery>,
    tracker: web::ReqData<QueryTracker>,
    db: web::Data<InstrumentedClient<FakeSalonDb>>,
) -> HttpResponse {
    let query = query.into_inner();
    let tracker = tracker.into_inner();
    match db.run(&tracker, |db| db.find_clients(query.limit)).await {
        Ok(rows) => HttpResponse::Ok().json(json!({
            "page": query.page,
            "limit": query.limit,
            "sort": query.sort,
            "data": rows,
        })),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": e})),
    }
}

async fn list_appointments() -> HttpResponse {
    let call = APPOINTMENT_CALLS.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!({"call": call, "appointments": [{"id": 9, "room": null}]}))
}

async fn slow_report() -> HttpResponse {
    tokio::time::sleep(Duration::from_millis(500)).await;
    HttpResponse::Ok().json(json!({"report": "done"}))
}

async fn large_catalog() -> HttpResponse {
    let services: Vec<_> = (0..200)
        .map(|id| json!({"id": id, "name": "Balayage with toner and gloss"}))
        .collect();
    HttpResponse::Ok().json(services)
}

/// Salon API routes used by the chain tests
pub fn salon_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new(InstrumentedClient::new(FakeSalonDb)))
        .route("/api/clients", web::get().to(list_clients))
        .route("/api/appointments", web::get().to(list_appointments))
        .route("/api/reports/slow", web::get().to(slow_report))
        .route("/api/catalog", web::get().to(large_catalog));
}

/// Write `yaml` to a temporary file that lives as long as the handle
pub fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(yaml.as_bytes()).expect("write config");
    file
}
