//! Response cache middleware for GET requests

use super::helpers::{X_CACHE, bearer_token, is_json, read_body, set_header};
use crate::server::state::AppState;
use crate::services::response_cache_key;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::Method;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

/// Serves repeated GETs from the cache store.
///
/// Hits answer with the stored JSON and `X-Cache: HIT`. Misses run the
/// handler, answer with `X-Cache: MISS` and store 2xx JSON bodies in a
/// background task.
pub struct ResponseCacheMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ResponseCacheMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = ResponseCacheMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResponseCacheMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for response cache middleware
pub struct ResponseCacheMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ResponseCacheMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let app_state = req.app_data::<web::Data<AppState>>().cloned().filter(|state| {
            state.cache.is_enabled()
                && req.method() == Method::GET
                && !state.config.cache.is_skipped(req.path())
        });

        Box::pin(async move {
            let Some(state) = app_state else {
                return Ok(service.call(req).await?.map_into_boxed_body());
            };

            let key = response_cache_key(
                req.path(),
                req.query_string(),
                bearer_token(req.headers()),
            );

            if let Some(body) = state.cache.get_raw(&key).await {
                debug!(key = %key, "Response cache hit");
                let response = HttpResponse::Ok()
                    .content_type(ContentType::json())
                    .insert_header((X_CACHE, "HIT"))
                    .body(body);
                return Ok(req.into_response(response));
            }

            let res = service.call(req).await?;
            let cacheable = res.status().is_success() && is_json(res.headers());
            let mut buffered = read_body(res).await?;
            set_header(buffered.head.headers_mut(), X_CACHE, "MISS");

            if cacheable {
                match String::from_utf8(buffered.body.to_vec()) {
                    Ok(body) => {
                        let cache = state.cache.clone();
                        actix_web::rt::spawn(async move {
                            cache.cache_raw(&key, &body, None).await;
                        });
                    }
                    Err(_) => debug!(key = %key, "Skipping non-UTF-8 response body"),
                }
            }

            Ok(buffered.into_response())
        })
    }
}
