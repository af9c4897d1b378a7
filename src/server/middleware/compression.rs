//! Compression signalling middleware
//!
//! Decides whether a response should be compressed and says so in
//! `X-Compression-Hint`; encoding is left to the fronting proxy.

use super::helpers::{X_COMPRESSION_HINT, accepts_gzip, is_compressible, set_header};
use actix_web::body::{BodySize, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;

pub struct CompressionSignalMiddleware {
    threshold_bytes: usize,
}

impl CompressionSignalMiddleware {
    pub fn new(threshold_bytes: usize) -> Self {
        Self { threshold_bytes }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CompressionSignalMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = CompressionSignalMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CompressionSignalMiddlewareService {
            service,
            threshold_bytes: self.threshold_bytes,
        }))
    }
}

/// Service implementation for compression signalling middleware
pub struct CompressionSignalMiddlewareService<S> {
    service: S,
    threshold_bytes: usize,
}

impl<S, B> Service<ServiceRequest> for CompressionSignalMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_accepts_gzip = accepts_gzip(req.headers());
        let threshold = self.threshold_bytes as u64;
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if client_accepts_gzip && should_compress(&res, threshold) {
                set_header(res.headers_mut(), X_COMPRESSION_HINT, "gzip");
            }
            Ok(res)
        })
    }
}

fn should_compress<B: MessageBody>(res: &ServiceResponse<B>, threshold: u64) -> bool {
    if res.headers().contains_key(header::CONTENT_ENCODING) || !is_compressible(res.headers()) {
        return false;
    }
    matches!(res.response().body().size(), BodySize::Sized(size) if size > threshold)
}
