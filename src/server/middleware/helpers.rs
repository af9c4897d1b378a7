//! Helper functions for middleware

use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse};

pub const X_CACHE: &str = "x-cache";
pub const X_RESPONSE_TIME: &str = "x-response-time";
pub const X_MEMORY_USAGE: &str = "x-memory-usage";
pub const X_COMPRESSION_HINT: &str = "x-compression-hint";

/// Insert a header, skipping values that are not valid header text
pub fn set_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}

/// Buffered response: request, head without body, and the body bytes
pub(crate) struct BufferedResponse {
    pub request: HttpRequest,
    pub head: HttpResponse<()>,
    pub body: Bytes,
}

impl BufferedResponse {
    /// Reassemble the service response unchanged
    pub fn into_response(self) -> ServiceResponse<BoxBody> {
        let body = self.body.clone();
        self.replace_body(body)
    }

    /// Reassemble the service response around a new body
    pub fn replace_body(self, body: Bytes) -> ServiceResponse<BoxBody> {
        ServiceResponse::new(self.request, self.head.set_body(BoxBody::new(body)))
    }
}

/// Collect a response body into memory
pub(crate) async fn read_body<B>(
    res: ServiceResponse<B>,
) -> Result<BufferedResponse, actix_web::Error>
where
    B: MessageBody + 'static,
{
    let (request, response) = res.into_parts();
    let (head, body) = response.into_parts();
    let body = body::to_bytes(body).await.map_err(|e| {
        let e: Box<dyn std::error::Error> = e.into();
        actix_web::error::ErrorInternalServerError(e.to_string())
    })?;
    Ok(BufferedResponse {
        request,
        head,
        body,
    })
}

/// Whether the content type is JSON (`application/json` or `+json`)
pub fn is_json(headers: &HeaderMap) -> bool {
    content_type(headers)
        .map(|ct| ct.starts_with("application/json") || ct.contains("+json"))
        .unwrap_or(false)
}

/// Whether the content type is JSON or text
pub fn is_compressible(headers: &HeaderMap) -> bool {
    is_json(headers)
        || content_type(headers)
            .map(|ct| ct.starts_with("text/"))
            .unwrap_or(false)
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_ascii_lowercase())
}

/// Bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Whether the client advertises gzip support
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|h| h.to_str().ok())
        .map(|value| {
            value.split(',').any(|coding| {
                let mut parts = coding.trim().split(';');
                let name = parts.next().unwrap_or("").trim();
                let rejected = parts.any(|p| p.trim().replace(' ', "") == "q=0");
                (name.eq_ignore_ascii_case("gzip") || name == "*") && !rejected
            })
        })
        .unwrap_or(false)
}
