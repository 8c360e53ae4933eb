//! Axum-based HTTP server for the promptgate gateway.
//!
//! This module exposes the orchestrator over HTTP. It owns no decision
//! logic: handlers decode the request, apply the request timeout and map
//! errors to status codes.
//!
//! # Components
//!
//! - `handlers`: generate, health, metrics and cache administration endpoints.
//! - `middleware`: request ID tracking and CORS.
//! - `routes`: the router that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
