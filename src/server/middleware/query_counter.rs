//! Per-request database call accounting
//!
//! [`InstrumentedClient`] wraps a database client once at startup. The
//! middleware gives each request its own [`QueryTracker`], and handlers pass
//! that tracker to [`InstrumentedClient::run`] so counts never leak between
//! concurrent requests.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::HttpMessage;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct QueryCounters {
    count: AtomicU32,
    elapsed_micros: AtomicU64,
}

/// Request-scoped query counter; clones share the same counters
#[derive(Debug, Clone, Default)]
pub struct QueryTracker {
    counters: Arc<QueryCounters>,
}

impl QueryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one query that took `elapsed`
    pub fn record(&self, elapsed: Duration) {
        self.counters.count.fetch_add(1, Ordering::Relaxed);
        self.counters
            .elapsed_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn count(&self) -> u32 {
        self.counters.count.load(Ordering::Relaxed)
    }

    /// Total query time in whole milliseconds
    pub fn time_ms(&self) -> u64 {
        self.counters.elapsed_micros.load(Ordering::Relaxed) / 1000
    }
}

/// Database client decorator that times every call against a tracker
#[derive(Debug, Clone)]
pub struct InstrumentedClient<C> {
    inner: C,
}

impl<C> InstrumentedClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Run `query` against the wrapped client, recording it on `tracker`.
    ///
    /// Failed queries are counted too.
    pub async fn run<'a, T, E, F, Fut>(&'a self, tracker: &QueryTracker, query: F) -> Result<T, E>
    where
        F: FnOnce(&'a C) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let result = query(&self.inner).await;
        tracker.record(start.elapsed());
        result
    }
}

/// Attaches a fresh [`QueryTracker`] to every request
pub struct QueryCountingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for QueryCountingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = QueryCountingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(QueryCountingMiddlewareService { service }))
    }
}

/// Service implementation for query counting middleware
pub struct QueryCountingMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for QueryCountingMiddlewareService<S>
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
        req.extensions_mut().insert(QueryTracker::new());
        Box::pin(self.service.call(req))
    }
}
