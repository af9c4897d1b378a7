//! Tests for server module
//!
//! This module contains all tests for the server components.

#[cfg(test)]
mod tests {
    use crate::config::{CacheBackendKind, Config};
    use crate::monitoring::NewSample;
    use crate::monitoring::system::{StaticGauge, StaticProbe};
    use crate::server::builder::ServerBuilder;
    use crate::server::middleware::{QueryTracker, X_CACHE, X_RESPONSE_TIME};
    use crate::server::routes::ListQuery;
    use crate::server::server::HttpServer;
    use crate::server::state::AppState;
    use crate::storage::CacheStore;
    use crate::storage::memory::MemoryStore;
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    fn state_with(
        config: Config,
        memory_percent: u64,
        store: Option<Arc<dyn CacheStore>>,
    ) -> web::Data<AppState> {
        web::Data::new(
            AppState::with_components(
                config,
                Arc::new(StaticProbe::with_memory(memory_percent, 100)),
                Arc::new(StaticGauge(10)),
                store,
            )
            .unwrap(),
        )
    }

    fn cached_config() -> Config {
        let mut config = Config::default();
        config.cache.enabled = true;
        config.cache.backend = CacheBackendKind::Memory;
        config
    }

    async fn list_customers(
        query: web::Query<ListQuery>,
        tracker: web::ReqData<QueryTracker>,
    ) -> HttpResponse {
        tracker.record(Duration::from_millis(3));
        let query = query.into_inner();
        HttpResponse::Ok().json(json!({
            "limit": query.limit,
            "sort": query.sort,
            "items": [{"id": 1, "name": "Aiko", "phone": null}]
        }))
    }

    fn salon_routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/api/customers", web::get().to(list_customers));
    }

    #[actix_web::test]
    async fn test_health_reports_healthy() {
        let state = state_with(Config::default(), 10, None);
        let app = test::init_service(HttpServer::create_app(state, |_| {})).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["memory"]["percentage"], 10.0);
        assert_eq!(body["responseTime"]["p95"], 0);
        assert!(body["uptime"].as_f64().is_some());
        assert!(body["timestamp"].is_string());
        assert!(body["alerts"].is_array());
    }

    #[actix_web::test]
    async fn test_health_critical_returns_503() {
        let state = state_with(Config::default(), 95, None);
        let app = test::init_service(HttpServer::create_app(state, |_| {})).await;

        for path in ["/health", "/healthz"] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["status"], "critical");
            let alerts: Vec<&str> = body["alerts"]
                .as_array()
                .unwrap()
                .iter()
                .filter_map(Value::as_str)
                .collect();
            assert!(alerts.contains(&"High memory usage detected"));
        }
    }

    #[actix_web::test]
    async fn test_health_warning_still_serves() {
        let state = state_with(Config::default(), 85, None);
        let app = test::init_service(HttpServer::create_app(state, |_| {})).await;

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "warning");
    }

    #[actix_web::test]
    async fn test_full_chain_on_application_route() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new(100));
        let state = state_with(cached_config(), 10, Some(store));
        let app =
            test::init_service(HttpServer::create_app(state.clone(), salon_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/customers?limit=1000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(X_RESPONSE_TIME).is_some());
        assert_eq!(resp.headers().get(X_CACHE).unwrap(), "MISS");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "limit": 100,
                "sort": "createdAt:desc",
                "items": [{"id": 1, "name": "Aiko"}]
            })
        );

        let samples = state.metrics.snapshot();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].endpoint, "/api/customers");
        assert_eq!(samples[0].db_query_count, 1);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let req = test::TestRequest::get()
            .uri("/api/customers?limit=1000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(X_CACHE).unwrap(), "HIT");
        let cached: Value = test::read_body_json(resp).await;
        assert_eq!(cached, body);
    }

    #[actix_web::test]
    async fn test_performance_stats() {
        let state = state_with(Config::default(), 10, None);
        state
            .metrics
            .record(NewSample::new("/api/bookings", "GET", 120));
        state
            .metrics
            .record(NewSample::new("/api/bookings", "GET", 80).with_status(500));
        let app = test::init_service(HttpServer::create_app(state, |_| {})).await;

        let req = test::TestRequest::get()
            .uri("/performance/stats")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["metrics"]["totalSamples"], 2);
        assert_eq!(body["metrics"]["averageResponseTimeMs"], 100.0);
        assert_eq!(body["metrics"]["statusClasses"]["5xx"], 1);
        assert_eq!(body["metrics"]["slowestEndpoints"][0]["endpoint"], "/api/bookings");
        assert_eq!(body["baseRateLimit"], 100);
        assert!(body.get("cache").is_none());
    }

    #[actix_web::test]
    async fn test_cache_invalidation_endpoint() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new(100));
        let state = state_with(cached_config(), 10, Some(Arc::clone(&store)));
        state.cache.cache_raw("/api/services", "[]", None).await;
        state.cache.cache_raw("/api/services:page=2", "[]", None).await;
        state.cache.cache_raw("/api/staff", "[]", None).await;
        let app = test::init_service(HttpServer::create_app(state.clone(), |_| {})).await;

        let req = test::TestRequest::delete()
            .uri("/performance/cache?pattern=/api/services*")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"pattern": "/api/services*", "removed": 2}));

        let req = test::TestRequest::delete()
            .uri("/performance/cache")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"pattern": "*", "removed": 1}));
        assert!(store.keys("*").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_server_builder_requires_config() {
        assert!(ServerBuilder::new().build().await.is_err());
    }

    #[actix_web::test]
    async fn test_server_builder_with_config() {
        let mut config = Config::default();
        config.cache.enabled = false;
        let server = ServerBuilder::new()
            .with_config(config)
            .with_routes(salon_routes)
            .build()
            .await
            .unwrap();
        assert_eq!(server.config().port, Config::default().server.port);
        assert!(!server.state().cache.is_enabled());
    }
}
