//! Adaptive control middleware
//!
//! Evaluates health before the request runs, attaches the scaled rate limit
//! for a downstream limiter and runs the memory and (sampled) pool
//! optimisers.

use crate::monitoring::{AdjustedRateLimit, HealthStatus};
use crate::server::state::AppState;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

pub struct AdaptiveControlMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdaptiveControlMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AdaptiveControlMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdaptiveControlMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for adaptive control middleware
pub struct AdaptiveControlMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdaptiveControlMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let app_state = req
            .app_data::<web::Data<AppState>>()
            .cloned()
            .filter(|state| state.adaptive.enabled);

        Box::pin(async move {
            if let Some(state) = app_state {
                let report = state.evaluator.evaluate().await;
                let limit = AdjustedRateLimit::new(state.adaptive.base_rate_limit, report.status);
                if report.status != HealthStatus::Healthy {
                    debug!(
                        status = %report.status,
                        limit = limit.limit,
                        base = limit.base,
                        "Scaled rate limit"
                    );
                }
                req.extensions_mut().insert(limit);

                state.adaptive.memory.run();
                state.adaptive.pool.maybe_run();
            }

            service.call(req).await
        })
    }
}
