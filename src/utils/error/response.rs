//! HTTP response handling for errors

use super::types::PerfError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for PerfError {
    fn status_code(&self) -> StatusCode {
        match self {
            PerfError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            PerfError::OutboundBlocked(_) => StatusCode::FORBIDDEN,
            PerfError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            PerfError::Config(_) => ("CONFIG_ERROR", self.to_string()),
            #[cfg(feature = "redis")]
            PerfError::Redis(_) => ("CACHE_ERROR", "Cache operation failed".to_string()),
            PerfError::Cache(_) => ("CACHE_ERROR", "Cache operation failed".to_string()),
            PerfError::HttpClient(_) => ("UPSTREAM_ERROR", "Upstream request failed".to_string()),
            PerfError::Timeout(_) => ("TIMEOUT", self.to_string()),
            PerfError::OutboundBlocked(_) => ("OUTBOUND_BLOCKED", self.to_string()),
            _ => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
