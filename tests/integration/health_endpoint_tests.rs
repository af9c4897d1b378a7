//! Health and performance endpoint integration tests

#[cfg(test)]
mod tests {
    use crate::common::{salon_routes, test_state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use salon_perf::config::Config;
    use salon_perf::server::HttpServer;
    use serde_json::Value;

    /// A fresh process with low memory reports healthy
    #[actix_web::test]
    async fn test_health_on_fresh_state() {
        let app = test::init_service(HttpServer::create_app(
            test_state(Config::default(), 20, false),
            salon_routes,
        ))
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["responseTime"]["average"], 0.0);
    }

    /// Response-time percentiles reflect traffic that went through the chain
    #[actix_web::test]
    async fn test_health_reflects_recorded_traffic() {
        let state = test_state(Config::default(), 20, false);
        let app =
            test::init_service(HttpServer::create_app(state.clone(), salon_routes)).await;

        for _ in 0..5 {
            let req = test::TestRequest::get().uri("/api/clients").to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get().uri("/healthz").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(state.metrics.total_recorded(), 6);
    }

    /// Critical memory takes the instance out of rotation
    #[actix_web::test]
    async fn test_health_critical_memory() {
        let app = test::init_service(HttpServer::create_app(
            test_state(Config::default(), 96, false),
            salon_routes,
        ))
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "critical");
        assert_eq!(body["memory"]["percentage"], 96.0);
    }

    /// Stats list the routes that were hit
    #[actix_web::test]
    async fn test_stats_after_traffic() {
        let state = test_state(Config::default(), 20, true);
        let app =
            test::init_service(HttpServer::create_app(state.clone(), salon_routes)).await;

        for uri in ["/api/clients", "/api/clients?page=2", "/api/catalog"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/performance/stats")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["metrics"]["totalSamples"], 3);
        assert_eq!(body["metrics"]["statusClasses"]["2xx"], 3);

        let endpoints: Vec<&str> = body["metrics"]["slowestEndpoints"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["endpoint"].as_str())
            .collect();
        assert!(endpoints.contains(&"/api/clients"));
        assert!(endpoints.contains(&"/api/catalog"));
        assert!(body["cache"]["keyspace_misses"].as_u64().is_some());
    }
}
