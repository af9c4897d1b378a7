//! Slow-request alert delivery

use super::sample::MetricSample;
use crate::utils::error::Result;
use tracing::error;

/// Receives samples that crossed the alert threshold
pub trait AlertSink: Send + Sync + std::fmt::Debug {
    /// Deliver an alert for `sample`; errors are logged by the caller
    fn slow_request(&self, sample: &MetricSample) -> Result<()>;
}

/// Default sink: emits an `error!` event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn slow_request(&self, sample: &MetricSample) -> Result<()> {
        error!(
            endpoint = %sample.endpoint,
            method = %sample.method,
            response_time_ms = sample.response_time_ms,
            status = sample.status_code,
            "Very slow request detected"
        );
        Ok(())
    }
}
