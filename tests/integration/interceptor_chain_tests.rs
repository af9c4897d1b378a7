//! Interceptor chain integration tests
//!
//! Every request here passes through the full chain mounted by
//! `HttpServer::create_app`.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::APPOINTMENT_CALLS;
    use crate::common::{salon_routes, test_state};
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test, web};
    use salon_perf::config::Config;
    use salon_perf::monitoring::AdjustedRateLimit;
    use salon_perf::server::HttpServer;
    use salon_perf::server::middleware::{
        X_CACHE, X_COMPRESSION_HINT, X_MEMORY_USAGE, X_RESPONSE_TIME,
    };
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    // ==================== Pagination, shaping, query counting ====================

    /// List requests get defaults, clamped limits and null-free bodies
    #[actix_web::test]
    async fn test_list_request_through_chain() {
        let state = test_state(Config::default(), 20, false);
        let app =
            test::init_service(HttpServer::create_app(state.clone(), salon_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/clients?limit=500")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let timing = resp.headers().get(X_RESPONSE_TIME).unwrap().to_str().unwrap();
        assert!(timing.ends_with("ms"));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 100);
        assert_eq!(body["sort"], "createdAt:desc");
        assert_eq!(
            body["data"][0],
            json!({"id": 1, "name": "Client 1"}),
            "null fields are stripped"
        );

        let samples = state.metrics.snapshot();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].endpoint, "/api/clients");
        assert_eq!(samples[0].db_query_count, 1);
    }

    /// `fields=` keeps only the named top-level keys
    #[actix_web::test]
    async fn test_field_selection() {
        let app = test::init_service(HttpServer::create_app(
            test_state(Config::default(), 20, false),
            salon_routes,
        ))
        .await;

        let req = test::TestRequest::get()
            .uri("/api/clients?fields=limit,sort")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"limit": 20, "sort": "createdAt:desc"}));
    }

    // ==================== Response cache ====================

    /// Second identical GET is served from the cache until invalidated
    #[actix_web::test]
    async fn test_cache_hit_and_invalidation() {
        let state = test_state(Config::default(), 20, true);
        let app =
            test::init_service(HttpServer::create_app(state.clone(), salon_routes)).await;
        let before = APPOINTMENT_CALLS.load(Ordering::SeqCst);

        let get = || {
            test::TestRequest::get()
                .uri("/api/appointments")
                .insert_header(("Authorization", "Bearer front-desk"))
                .to_request()
        };

        let resp = test::call_service(&app, get()).await;
        assert_eq!(resp.headers().get(X_CACHE).unwrap(), "MISS");
        let first: Value = test::read_body_json(resp).await;
        assert_eq!(first["appointments"], json!([{"id": 9}]));

        tokio::time::sleep(Duration::from_millis(50)).await;

        let resp = test::call_service(&app, get()).await;
        assert_eq!(resp.headers().get(X_CACHE).unwrap(), "HIT");
        let second: Value = test::read_body_json(resp).await;
        assert_eq!(first, second);
        assert_eq!(APPOINTMENT_CALLS.load(Ordering::SeqCst) - before, 1);

        let req = test::TestRequest::delete()
            .uri("/performance/cache?pattern=/api/appointments*")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["removed"], 1);

        let resp = test::call_service(&app, get()).await;
        assert_eq!(resp.headers().get(X_CACHE).unwrap(), "MISS");
        assert_eq!(APPOINTMENT_CALLS.load(Ordering::SeqCst) - before, 2);
    }

    /// Health and performance routes are never cached
    #[actix_web::test]
    async fn test_operational_routes_bypass_cache() {
        let app = test::init_service(HttpServer::create_app(
            test_state(Config::default(), 20, true),
            salon_routes,
        ))
        .await;

        for uri in ["/health", "/healthz", "/performance/stats"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.headers().get(X_CACHE).is_none(), "{} was cached", uri);
        }
    }

    // ==================== Timeout ====================

    /// A handler past the deadline yields exactly one 408 and one sample
    #[actix_web::test]
    async fn test_timeout_through_chain() {
        let mut config = Config::default();
        config.interceptors.request_timeout_ms = 100;
        let state = test_state(config, 20, false);
        let app =
            test::init_service(HttpServer::create_app(state.clone(), salon_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/reports/slow")
            .to_request();
        let err = test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::REQUEST_TIMEOUT
        );

        let samples = state.metrics.snapshot();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].status_code, 408);
    }

    // ==================== Compression signal ====================

    #[actix_web::test]
    async fn test_compression_hint_for_large_json() {
        let app = test::init_service(HttpServer::create_app(
            test_state(Config::default(), 20, false),
            salon_routes,
        ))
        .await;

        let req = test::TestRequest::get()
            .uri("/api/catalog")
            .insert_header(("Accept-Encoding", "br, gzip"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(X_COMPRESSION_HINT).unwrap(), "gzip");

        let req = test::TestRequest::get()
            .uri("/api/clients")
            .insert_header(("Accept-Encoding", "gzip"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.headers().get(X_COMPRESSION_HINT).is_none());
    }

    // ==================== Adaptive controls ====================

    async fn rate_limit(limit: Option<web::ReqData<AdjustedRateLimit>>) -> HttpResponse {
        HttpResponse::Ok().json(limit.map(|l| l.limit))
    }

    fn limit_routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/api/limit", web::get().to(rate_limit));
    }

    #[actix_web::test]
    async fn test_rate_limit_tracks_health() {
        for (memory, expected) in [(20, 100), (85, 75), (95, 50)] {
            let app = test::init_service(HttpServer::create_app(
                test_state(Config::default(), memory, false),
                limit_routes,
            ))
            .await;

            let req = test::TestRequest::get().uri("/api/limit").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body, json!(expected), "memory at {}%", memory);
        }
    }

    // ==================== Dev mode ====================

    #[actix_web::test]
    async fn test_memory_header_only_in_dev_mode() {
        let mut config = Config::default();
        config.server.dev_mode = true;
        let app = test::init_service(HttpServer::create_app(
            test_state(config, 37, false),
            salon_routes,
        ))
        .await;
        let req = test::TestRequest::get().uri("/api/clients").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(X_MEMORY_USAGE).unwrap(), "37.00%");

        let app = test::init_service(HttpServer::create_app(
            test_state(Config::default(), 37, false),
            salon_routes,
        ))
        .await;
        let req = test::TestRequest::get().uri("/api/clients").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.headers().get(X_MEMORY_USAGE).is_none());
    }
}
