//! Pagination and sort defaults for list reads

use crate::config::PaginationConfig;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::Method;
use actix_web::http::uri::{PathAndQuery, Uri};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

/// Rewrite a query string so it carries a valid `limit` and a `sort`.
///
/// A missing, unparsable or zero `limit` becomes the default; a larger one is
/// clamped to the maximum. Returns `None` when nothing had to change.
pub fn apply_pagination_defaults(query: &str, config: &PaginationConfig) -> Option<String> {
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let mut changed = false;

    let limit = pairs
        .iter()
        .find(|(k, _)| k == "limit")
        .and_then(|(_, v)| v.parse::<u32>().ok())
        .filter(|limit| *limit > 0);
    let effective = match limit {
        Some(limit) if limit > config.max_limit => Some(config.max_limit),
        Some(_) => None,
        None => Some(config.default_limit),
    };
    if let Some(effective) = effective {
        let value = effective.to_string();
        match pairs.iter_mut().find(|(k, _)| k == "limit") {
            Some((_, v)) => *v = value,
            None => pairs.push(("limit".to_string(), value)),
        }
        changed = true;
    }

    if !pairs.iter().any(|(k, _)| k == "sort") {
        pairs.push(("sort".to_string(), config.default_sort.clone()));
        changed = true;
    }

    if !changed {
        return None;
    }
    Some(
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish(),
    )
}

/// Injects pagination defaults into GET query strings
pub struct PaginationDefaultsMiddleware {
    config: Rc<PaginationConfig>,
}

impl PaginationDefaultsMiddleware {
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for PaginationDefaultsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = PaginationDefaultsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PaginationDefaultsMiddlewareService {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

/// Service implementation for pagination defaults middleware
pub struct PaginationDefaultsMiddlewareService<S> {
    service: S,
    config: Rc<PaginationConfig>,
}

impl<S, B> Service<ServiceRequest> for PaginationDefaultsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if req.method() == Method::GET {
            if let Some(query) = apply_pagination_defaults(req.query_string(), &self.config) {
                if let Some(uri) = with_query(req.uri(), &query) {
                    debug!(path = %req.path(), query = %query, "Applied pagination defaults");
                    req.head_mut().uri = uri;
                }
            }
        }
        Box::pin(self.service.call(req))
    }
}

fn with_query(uri: &Uri, query: &str) -> Option<Uri> {
    let path_and_query: PathAndQuery = format!("{}?{}", uri.path(), query).parse().ok()?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}
