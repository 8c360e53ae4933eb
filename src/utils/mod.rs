//! Utility functions and helpers for the promptgate gateway.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization.
//! - `retry`: Retry with backoff that respects upstream `Retry-After` hints.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
