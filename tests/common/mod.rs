// Shared test doubles for orchestrator and server tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use promptgate::cache::{CacheKey, CacheStats, InMemoryCache, ResponseCache};
use promptgate::error::{GatewayError, Result, SubsystemError};
use promptgate::ledger::{Ledger, WorkflowRecord};
use promptgate::models::GenerationParams;
use promptgate::orchestrator::OrchestratorSettings;
use promptgate::remote_config::{ConfigDocument, ConfigSource};
use promptgate::runner::ModelRunner;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn settings() -> OrchestratorSettings {
    OrchestratorSettings {
        default_model: "default-model".to_string(),
        config_name: "generation".to_string(),
        cache_ttl_seconds: 3600,
        key_prefix_chars: 100,
        default_params: GenerationParams {
            temperature: 0.7,
            max_tokens: 1024,
        },
    }
}

/// Records every call and answers with a text derived from the prompt.
#[derive(Default)]
pub struct RecordingRunner {
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String, GenerationParams)>>,
    delay: Option<Duration>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (model, prompt, params) of every invocation, oldest first.
    pub fn seen(&self) -> Vec<(String, String, GenerationParams)> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl ModelRunner for RecordingRunner {
    async fn run(&self, model: &str, prompt: &str, params: &GenerationParams) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen
            .lock()
            .push((model.to_string(), prompt.to_string(), *params));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(format!("answer #{} to {}", n, prompt))
    }
}

/// Always fails upstream.
pub struct FailingRunner;

#[async_trait]
impl ModelRunner for FailingRunner {
    async fn run(&self, _model: &str, _prompt: &str, _params: &GenerationParams) -> Result<String> {
        Err(GatewayError::UpstreamFailure("model exploded".to_string()))
    }
}

/// Fails with a non-upstream error kind.
pub struct MisbehavingRunner;

#[async_trait]
impl ModelRunner for MisbehavingRunner {
    async fn run(&self, _model: &str, _prompt: &str, _params: &GenerationParams) -> Result<String> {
        Err(GatewayError::Internal("runner bug".to_string()))
    }
}

/// Wraps the in-memory cache and counts traffic.
#[derive(Default)]
pub struct CountingCache {
    pub inner: InMemoryCache,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseCache for CountingCache {
    async fn get(&self, key: &CacheKey) -> std::result::Result<Option<String>, SubsystemError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl_seconds: u64) -> std::result::Result<(), SubsystemError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value, ttl_seconds).await
    }

    async fn clear(&self) -> std::result::Result<(), SubsystemError> {
        self.inner.clear().await
    }

    fn stats(&self) -> Option<CacheStats> {
        self.inner.stats()
    }
}

/// Cache whose backend is unreachable.
pub struct BrokenCache;

#[async_trait]
impl ResponseCache for BrokenCache {
    async fn get(&self, _key: &CacheKey) -> std::result::Result<Option<String>, SubsystemError> {
        Err(SubsystemError::CacheUnavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: u64) -> std::result::Result<(), SubsystemError> {
        Err(SubsystemError::CacheUnavailable("connection refused".to_string()))
    }

    async fn clear(&self) -> std::result::Result<(), SubsystemError> {
        Err(SubsystemError::CacheUnavailable("connection refused".to_string()))
    }
}

/// Reads work, writes fail.
#[derive(Default)]
pub struct ReadOnlyCache {
    pub inner: InMemoryCache,
}

#[async_trait]
impl ResponseCache for ReadOnlyCache {
    async fn get(&self, key: &CacheKey) -> std::result::Result<Option<String>, SubsystemError> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: u64) -> std::result::Result<(), SubsystemError> {
        Err(SubsystemError::CacheUnavailable("read-only replica".to_string()))
    }

    async fn clear(&self) -> std::result::Result<(), SubsystemError> {
        self.inner.clear().await
    }
}

/// Serves a fixed document and counts loads.
pub struct CountingConfig {
    document: ConfigDocument,
    loads: AtomicUsize,
}

impl CountingConfig {
    pub fn new(value: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            document: ConfigDocument::from_json(value).expect("test document must be an object"),
            loads: AtomicUsize::new(0),
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for CountingConfig {
    async fn load(&self, _name: &str) -> std::result::Result<ConfigDocument, SubsystemError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }
}

/// Remote store that is always down.
pub struct BrokenConfig;

#[async_trait]
impl ConfigSource for BrokenConfig {
    async fn load(&self, name: &str) -> std::result::Result<ConfigDocument, SubsystemError> {
        Err(SubsystemError::DegradedConfig(format!("{} unreachable", name)))
    }
}

/// Ledger that refuses every write.
pub struct BrokenLedger;

#[async_trait]
impl Ledger for BrokenLedger {
    async fn append(&self, _record: &WorkflowRecord) -> std::result::Result<(), SubsystemError> {
        Err(SubsystemError::LedgerUnavailable("disk full".to_string()))
    }

    fn backend(&self) -> &'static str {
        "broken"
    }
}
