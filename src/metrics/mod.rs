// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    MODEL_CALLS,
    MODEL_CALL_DURATION,
    CACHE_OPERATIONS,
    DEGRADATIONS,
    LEDGER_WRITES,
    CONFIG_LOADS,
};

use crate::error::SubsystemError;

/// Helper to record a finished generate request
pub fn record_request(source: &str, status: &str, duration_secs: f64) {
    REQUESTS_TOTAL.with_label_values(&[source, status]).inc();
    REQUEST_DURATION.with_label_values(&[source]).observe(duration_secs);
}

/// Helper to record model invocation metrics
pub fn record_model_call(model: &str, outcome: &str, duration_secs: f64) {
    MODEL_CALLS.with_label_values(&[model, outcome]).inc();
    MODEL_CALL_DURATION.with_label_values(&[model]).observe(duration_secs);
}

/// Helpers to record cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_write() {
    CACHE_OPERATIONS.with_label_values(&["write"]).inc();
}

pub fn record_cache_clear() {
    CACHE_OPERATIONS.with_label_values(&["clear"]).inc();
}

/// Helper to record an absorbed subsystem failure
pub fn record_degradation(err: &SubsystemError) {
    DEGRADATIONS.with_label_values(&[err.label()]).inc();
}

pub fn record_ledger_write(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    LEDGER_WRITES.with_label_values(&[outcome]).inc();
}

pub fn record_config_load(success: bool) {
    let outcome = if success { "success" } else { "degraded" };
    CONFIG_LOADS.with_label_values(&[outcome]).inc();
}
