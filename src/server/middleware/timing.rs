//! Timing middleware: one metrics sample per completed request

use super::helpers::{X_MEMORY_USAGE, X_RESPONSE_TIME, set_header};
use super::query_counter::QueryTracker;
use crate::monitoring::NewSample;
use crate::server::state::AppState;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::error::InternalError;
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

/// Records a sample and sets `X-Response-Time` on every response
pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TimingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingMiddlewareService { service }))
    }
}

/// Service implementation for timing middleware
pub struct TimingMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TimingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let elapsed_ms = start_time.elapsed().as_millis() as u64;
            let response_time = format!("{}ms", elapsed_ms);
            let Some(state) = app_state else {
                return with_response_time(result, &response_time);
            };

            let memory = state.probe.memory();
            let mut sample = NewSample {
                endpoint: path,
                method,
                response_time_ms: elapsed_ms,
                memory_used_bytes: memory.used_bytes,
                ..Default::default()
            };

            match &result {
                Ok(res) => {
                    if let Some(pattern) = res.request().match_pattern() {
                        sample.endpoint = pattern;
                    }
                    if let Some(tracker) = res.request().extensions().get::<QueryTracker>() {
                        sample.db_query_count = tracker.count();
                        sample.db_query_time_ms = tracker.time_ms();
                    }
                    sample.status_code = res.status().as_u16();
                }
                // Errors surfaced by inner middleware (timeouts) still count
                Err(e) => sample.status_code = e.as_response_error().status_code().as_u16(),
            }
            state.metrics.record(sample);

            let mut result = with_response_time(result, &response_time);
            if state.config.server.dev_mode {
                if let Ok(res) = result.as_mut() {
                    set_header(
                        res.headers_mut(),
                        X_MEMORY_USAGE,
                        &format!("{:.2}%", memory.percentage()),
                    );
                }
            }
            result
        })
    }
}

/// Set `X-Response-Time` on the response, or on the response an error
/// renders to.
fn with_response_time<B>(
    result: Result<ServiceResponse<B>, actix_web::Error>,
    response_time: &str,
) -> Result<ServiceResponse<B>, actix_web::Error> {
    match result {
        Ok(mut res) => {
            set_header(res.headers_mut(), X_RESPONSE_TIME, response_time);
            Ok(res)
        }
        Err(e) => {
            let mut response = e.error_response();
            set_header(response.headers_mut(), X_RESPONSE_TIME, response_time);
            Err(InternalError::from_response(e, response).into())
        }
    }
}
