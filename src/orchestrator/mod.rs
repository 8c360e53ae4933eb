//! Request orchestration and the cache-aside decision sequence.
//!
//! For every request the [`Orchestrator`]:
//!
//! 1. validates it, before touching anything external;
//! 2. derives the cache key from the model name and a prompt prefix;
//! 3. returns a live cache entry immediately, with no config load, model
//!    call or ledger write;
//! 4. otherwise loads the configuration document (empty on failure),
//!    merges parameters, runs the model, writes the cache, appends to the
//!    ledger and returns the fresh result.
//!
//! Cache, config and ledger failures are absorbed as [`SubsystemError`]s and
//! reported on the response. Only invalid input and upstream failures reach
//! the caller.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod builder;
mod params;

pub use builder::{build, build_with_runner};
pub use params::merge_params;

use crate::cache::{CacheKey, CacheStats, ResponseCache};
use crate::config::AppConfig;
use crate::error::{GatewayError, Result, SubsystemError};
use crate::ledger::{Ledger, WorkflowRecord};
use crate::metrics;
use crate::models::{
    model_label, resolve_model, AcceptedRequest, GenerateRequest, GenerateResponse,
    GenerationParams, ResponseSource,
};
use crate::remote_config::{ConfigDocument, ConfigSource, StaticConfigSource};
use crate::runner::ModelRunner;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Fixed knobs of the decision sequence.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Model used when a request names none.
    pub default_model: String,
    /// Logical name of the configuration document loaded on each miss.
    pub config_name: String,
    /// Lifetime of freshly written cache entries.
    pub cache_ttl_seconds: u64,
    /// Prompt characters feeding the cache key; `0` means the whole prompt.
    pub key_prefix_chars: usize,
    /// Lowest-precedence generation parameters.
    pub default_params: GenerationParams,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_model: config.model.default_model.clone(),
            config_name: config.remote_config.name.clone(),
            cache_ttl_seconds: config.cache.ttl_seconds,
            key_prefix_chars: config.cache.key_prefix_chars,
            default_params: GenerationParams {
                temperature: config.model.default_temperature,
                max_tokens: config.model.default_max_tokens,
            },
        }
    }
}

/// Composes cache, configuration, model and ledger into one request flow.
///
/// Holds no per-request state. The cache and ledger are shared by all
/// requests; concurrent misses on the same key may each call the model.
pub struct Orchestrator {
    cache: Option<Arc<dyn ResponseCache>>,
    config_source: Arc<dyn ConfigSource>,
    runner: Arc<dyn ModelRunner>,
    ledger: Option<Arc<dyn Ledger>>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    /// Uncached orchestrator with an empty static configuration and no ledger.
    pub fn new(runner: Arc<dyn ModelRunner>, settings: OrchestratorSettings) -> Self {
        Self {
            cache: None,
            config_source: Arc::new(StaticConfigSource::default()),
            runner,
            ledger: None,
            settings,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_config_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.config_source = source;
        self
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub fn ledger_backend(&self) -> Option<&'static str> {
        self.ledger.as_ref().map(|l| l.backend())
    }

    /// Serve one generate request.
    pub async fn handle(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let start = Instant::now();

        let accepted = match request.validate(&self.settings.default_model) {
            Ok(accepted) => accepted,
            Err(e) => {
                debug!("Rejected request: {}", e);
                metrics::record_request("none", "invalid_input", start.elapsed().as_secs_f64());
                return Err(e);
            }
        };

        let key = CacheKey::derive(
            accepted.model_name(),
            accepted.prompt(),
            self.settings.key_prefix_chars,
        );
        let mut degraded = Vec::new();

        if let Some(cached) = self.lookup(&key, &mut degraded).await {
            info!("Cache hit for model={} key={}", accepted.model_name(), short(&key));
            metrics::record_request(ResponseSource::Cache.as_str(), "ok", start.elapsed().as_secs_f64());
            return Ok(self.respond(&accepted, cached, ResponseSource::Cache, degraded));
        }

        let document = self.load_config(&mut degraded).await;
        let params = merge_params(&accepted, &document, &self.settings.default_params);
        let aliases = document.model_aliases();
        let target_model = resolve_model(accepted.model_name(), &aliases);
        let label = model_label(
            accepted.model_name(),
            &target_model,
            &aliases,
            &self.settings.default_model,
        );

        debug!(
            "Cache miss for model={} (resolved {}) key={} temperature={} max_tokens={}",
            accepted.model_name(),
            target_model,
            short(&key),
            params.temperature,
            params.max_tokens
        );

        let invoked = Instant::now();
        let outcome = self.runner.run(&target_model, accepted.prompt(), &params).await;
        let invoke_secs = invoked.elapsed().as_secs_f64();

        let result = match outcome {
            Ok(result) => {
                metrics::record_model_call(label, "success", invoke_secs);
                result
            }
            Err(e) => {
                metrics::record_model_call(label, "failure", invoke_secs);
                metrics::record_request(
                    ResponseSource::Ai.as_str(),
                    "upstream_failure",
                    start.elapsed().as_secs_f64(),
                );
                return Err(match e {
                    GatewayError::UpstreamFailure(msg) => GatewayError::UpstreamFailure(msg),
                    other => GatewayError::UpstreamFailure(other.to_string()),
                });
            }
        };

        self.store(&key, &result, &mut degraded).await;
        self.record(&accepted, &key, &result, &mut degraded).await;

        info!("Fresh result for model={} key={}", accepted.model_name(), short(&key));
        metrics::record_request(ResponseSource::Ai.as_str(), "ok", start.elapsed().as_secs_f64());
        Ok(self.respond(&accepted, result, ResponseSource::Ai, degraded))
    }

    /// Drop every cached response. `Ok(false)` when running uncached.
    pub async fn clear_cache(&self) -> std::result::Result<bool, SubsystemError> {
        let Some(cache) = &self.cache else {
            return Ok(false);
        };
        cache.clear().await?;
        metrics::record_cache_clear();
        info!("Response cache cleared");
        Ok(true)
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().and_then(|c| c.stats())
    }

    async fn lookup(&self, key: &CacheKey, degraded: &mut Vec<SubsystemError>) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(Some(value)) => {
                metrics::record_cache_hit();
                Some(value)
            }
            Ok(None) => {
                metrics::record_cache_miss();
                None
            }
            Err(e) => {
                metrics::record_cache_miss();
                note(degraded, e);
                None
            }
        }
    }

    async fn load_config(&self, degraded: &mut Vec<SubsystemError>) -> ConfigDocument {
        match self.config_source.load(&self.settings.config_name).await {
            Ok(document) => {
                metrics::record_config_load(true);
                document
            }
            Err(e) => {
                metrics::record_config_load(false);
                note(degraded, e);
                ConfigDocument::empty()
            }
        }
    }

    async fn store(&self, key: &CacheKey, value: &str, degraded: &mut Vec<SubsystemError>) {
        let Some(cache) = &self.cache else {
            return;
        };
        match cache.set(key, value, self.settings.cache_ttl_seconds).await {
            Ok(()) => metrics::record_cache_write(),
            Err(e) => note(degraded, e),
        }
    }

    async fn record(
        &self,
        accepted: &AcceptedRequest,
        key: &CacheKey,
        result: &str,
        degraded: &mut Vec<SubsystemError>,
    ) {
        let Some(ledger) = &self.ledger else {
            return;
        };
        let record = WorkflowRecord::new(
            accepted.prompt(),
            result,
            accepted.model_name(),
            key.as_str(),
        );
        match ledger.append(&record).await {
            Ok(()) => metrics::record_ledger_write(true),
            Err(e) => {
                metrics::record_ledger_write(false);
                note(degraded, e);
            }
        }
    }

    fn respond(
        &self,
        accepted: &AcceptedRequest,
        result: String,
        source: ResponseSource,
        degraded: Vec<SubsystemError>,
    ) -> GenerateResponse {
        GenerateResponse {
            result,
            source,
            model_name: accepted.model_name().to_string(),
            timestamp: Utc::now(),
            degraded,
        }
    }
}

/// Log, count and keep a subsystem failure; the request carries on.
fn note(degraded: &mut Vec<SubsystemError>, err: SubsystemError) {
    warn!("Continuing degraded: {}", err);
    metrics::record_degradation(&err);
    degraded.push(err);
}

/// First 16 characters of the digest, enough to correlate log lines.
fn short(key: &CacheKey) -> &str {
    let s = key.as_str();
    let digest_start = s.rfind(':').map(|i| i + 1).unwrap_or(0);
    let end = (digest_start + 16).min(s.len());
    &s[digest_start..end]
}
