// Error types for the promptgate gateway
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors a caller can observe. Anything else degrades into a [`SubsystemError`].
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// HTTP-agnostic classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadInput,
    UpstreamFailure,
    Internal,
}

impl GatewayError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            GatewayError::InvalidInput(_) => StatusClass::BadInput,
            GatewayError::UpstreamFailure(_) => StatusClass::UpstreamFailure,
            GatewayError::Internal(_) => StatusClass::Internal,
        }
    }
}

/// Non-fatal failure of a supporting subsystem.
///
/// These never abort a request. The orchestrator logs them, counts them and
/// attaches them to the response so callers and tests can see what degraded.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SubsystemError {
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("configuration degraded: {0}")]
    DegradedConfig(String),
}

impl SubsystemError {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SubsystemError::CacheUnavailable(_) => "cache",
            SubsystemError::LedgerUnavailable(_) => "ledger",
            SubsystemError::DegradedConfig(_) => "config",
        }
    }
}

// Convert GatewayError to HTTP responses for Axum
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self.status_class() {
            StatusClass::BadInput => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            StatusClass::UpstreamFailure => (StatusCode::BAD_GATEWAY, "upstream_error"),
            StatusClass::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        GatewayError::Internal(format!("Configuration error: {}", err))
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Internal(format!("IO error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
