//! JSON response shaping: field selection or null stripping

use super::helpers::{is_json, read_body};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web::Bytes;
use futures::future::{Ready, ready};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

/// Fields requested through `fields=a,b`, if any
pub fn requested_fields(query: &str) -> Option<Vec<String>> {
    let raw = url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "fields")
        .map(|(_, v)| v.into_owned())?;
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() { None } else { Some(fields) }
}

/// Keep only `fields` among the top-level keys of an object, or of each
/// object in an array. Other values pass through unchanged.
pub fn project_fields(value: Value, fields: &[String]) -> Value {
    fn project_object(object: Map<String, Value>, fields: &[String]) -> Map<String, Value> {
        object
            .into_iter()
            .filter(|(key, _)| fields.iter().any(|f| f == key))
            .collect()
    }

    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(object) => Value::Object(project_object(object, fields)),
                    other => other,
                })
                .collect(),
        ),
        Value::Object(object) => Value::Object(project_object(object, fields)),
        other => other,
    }
}

/// Remove every object entry whose value is null, at any depth
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

fn shape(body: Bytes, fields: Option<&[String]>) -> Bytes {
    let Ok(value) = serde_json::from_slice::<Value>(&body) else {
        return body;
    };
    let shaped = match fields {
        Some(fields) => project_fields(value, fields),
        None => strip_nulls(value),
    };
    serde_json::to_vec(&shaped).map(Bytes::from).unwrap_or(body)
}

pub struct ResponseShapingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ResponseShapingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = ResponseShapingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResponseShapingMiddlewareService { service }))
    }
}

/// Service implementation for response shaping middleware
pub struct ResponseShapingMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ResponseShapingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fields = requested_fields(req.query_string());
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            if !is_json(res.headers()) {
                return Ok(res.map_into_boxed_body());
            }

            let buffered = read_body(res).await?;
            let body = shape(buffered.body.clone(), fields.as_deref());
            Ok(buffered.replace_body(body))
        })
    }
}
