// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of generate requests by outcome
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of generate requests"),
        &["source", "status"], // source: cache, ai, none
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // MODEL METRICS
    // ============================================================================

    /// Total model invocations
    pub static ref MODEL_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("model_calls_total", "Total model invocations"),
        &["model", "outcome"], // outcome: success, failure
        REGISTRY
    ).unwrap();

    /// Model invocation duration, retries included
    pub static ref MODEL_CALL_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("model_call_duration_seconds", "Model invocation duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["model"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CACHE METRICS
    // ============================================================================

    /// Cache operations
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_operations_total", "Total cache operations"),
        &["operation"], // operation: hit, miss, write, clear
        REGISTRY
    ).unwrap();

    // ============================================================================
    // SUBSYSTEM METRICS
    // ============================================================================

    /// Non-fatal subsystem failures
    pub static ref DEGRADATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("degradations_total", "Subsystem failures absorbed by the orchestrator"),
        &["subsystem"], // subsystem: cache, ledger, config
        REGISTRY
    ).unwrap();

    /// Ledger appends
    pub static ref LEDGER_WRITES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("ledger_writes_total", "Total workflow ledger appends"),
        &["outcome"], // outcome: success, failure
        REGISTRY
    ).unwrap();

    /// Configuration document loads
    pub static ref CONFIG_LOADS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("config_loads_total", "Total configuration document loads"),
        &["outcome"], // outcome: success, degraded
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
