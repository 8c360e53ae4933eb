// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    cache_stats_handler, clear_cache_handler, generate_handler, health_handler, metrics_handler,
};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::ServerConfig;
use crate::orchestrator::Orchestrator;
use axum::{routing::{delete, get, post}, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub request_timeout: Duration,
}

pub fn create_router(server: &ServerConfig, orchestrator: Arc<Orchestrator>) -> Router {
    let state = AppState {
        orchestrator,
        request_timeout: Duration::from_secs(server.request_timeout_seconds),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/cache", delete(clear_cache_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .layer(tower_http::limit::RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}
