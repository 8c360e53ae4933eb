// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::GatewayError;
use crate::metrics::gather_metrics;
use crate::models::{GenerateRequest, GenerateResponse};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, error, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

impl HealthCheck {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            status: "warning".to_string(),
            message: message.into(),
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Running without a cache is allowed but every request hits the model
    let cache_check = match state.orchestrator.cache_stats() {
        Some(stats) => HealthCheck::ok(format!(
            "{} entries, {} hits, {} misses",
            stats.entries, stats.hits, stats.misses
        )),
        None if state.orchestrator.has_cache() => HealthCheck::ok("external cache"),
        None => {
            overall_status = HealthStatus::Degraded;
            HealthCheck::warning("cache disabled, every request invokes the model")
        }
    };
    checks.insert("cache".to_string(), cache_check);

    let ledger_check = match state.orchestrator.ledger_backend() {
        Some(backend) => HealthCheck::ok(format!("backend: {}", backend)),
        None => HealthCheck::ok("disabled"),
    };
    checks.insert("ledger".to_string(), ledger_check);

    let settings = state.orchestrator.settings();
    checks.insert(
        "configuration".to_string(),
        HealthCheck::ok(format!(
            "document: {}, default model: {}",
            settings.config_name, settings.default_model
        )),
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for POST /api/generate
pub async fn generate_handler(
    State(state): State<AppState>,
    body: Bytes, // Raw bytes so UTF-8 and JSON errors both map to InvalidInput
) -> Result<Json<GenerateResponse>, GatewayError> {
    let req: GenerateRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Failed to deserialize request: {}", e);
        GatewayError::InvalidInput(format!("JSON deserialization error: {}", e))
    })?;

    match tokio::time::timeout(state.request_timeout, state.orchestrator.handle(req)).await {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(e)) => {
            if !matches!(e, GatewayError::InvalidInput(_)) {
                error!("Generate request failed: {}", e);
            }
            Err(e)
        }
        Err(_) => {
            warn!(
                "Generate request exceeded {}s timeout",
                state.request_timeout.as_secs()
            );
            Err(GatewayError::UpstreamFailure(format!(
                "request timed out after {}s",
                state.request_timeout.as_secs()
            )))
        }
    }
}

/// Handler for GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Response {
    match state.orchestrator.cache_stats() {
        Some(stats) => Json(stats).into_response(),
        None => not_found("no in-process cache configured"),
    }
}

/// Handler for DELETE /api/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Response {
    match state.orchestrator.clear_cache().await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("no cache configured"),
        Err(e) => {
            error!("Cache clear failed: {}", e);
            let body = json!({
                "type": "error",
                "error": { "type": "cache_unavailable", "message": e.to_string() }
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

fn not_found(message: &str) -> Response {
    let body = json!({
        "type": "error",
        "error": { "type": "not_found_error", "message": message }
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
