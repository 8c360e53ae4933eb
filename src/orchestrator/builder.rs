// Orchestrator wiring from process configuration
// Author: kelexine (https://github.com/kelexine)

use super::{Orchestrator, OrchestratorSettings};
use crate::cache::InMemoryCache;
use crate::config::{AppConfig, LedgerBackend};
use crate::error::Result;
use crate::ledger::{InMemoryLedger, JsonlLedger};
use crate::remote_config::{ConfigDocument, HttpConfigSource, StaticConfigSource};
use crate::runner::{HttpModelRunner, ModelRunner};
use std::sync::Arc;
use tracing::info;

/// Assemble the reference adapters described by `config` around `runner`.
pub fn build_with_runner(config: &AppConfig, runner: Arc<dyn ModelRunner>) -> Result<Orchestrator> {
    let settings = OrchestratorSettings::from_config(config);
    let mut orchestrator = Orchestrator::new(runner, settings);

    if config.cache.enabled {
        info!(
            "Response cache enabled: ttl={}s, key prefix={}",
            config.cache.ttl_seconds,
            match config.cache.key_prefix_chars {
                0 => "whole prompt".to_string(),
                n => format!("first {} chars", n),
            }
        );
        orchestrator = orchestrator.with_cache(Arc::new(InMemoryCache::new()));
    } else {
        info!("Response cache disabled");
    }

    match HttpConfigSource::from_settings(&config.remote_config)? {
        Some(source) => {
            info!(
                "Loading '{}' from remote config store {}",
                config.remote_config.name,
                source.base_url()
            );
            orchestrator = orchestrator.with_config_source(Arc::new(source));
        }
        None => {
            let document = ConfigDocument::new(config.remote_config.values.clone());
            info!("Using static configuration ({} keys)", config.remote_config.values.len());
            orchestrator = orchestrator.with_config_source(Arc::new(StaticConfigSource::new(document)));
        }
    }

    match config.ledger.backend {
        LedgerBackend::None => info!("Workflow ledger disabled"),
        LedgerBackend::Memory => {
            info!("Workflow ledger: in-memory");
            orchestrator = orchestrator.with_ledger(Arc::new(InMemoryLedger::new()));
        }
        LedgerBackend::Jsonl => {
            info!("Workflow ledger: {}", config.ledger.path);
            orchestrator = orchestrator.with_ledger(Arc::new(JsonlLedger::new(&config.ledger.path)));
        }
    }

    Ok(orchestrator)
}

/// Assemble the orchestrator with the HTTP model runner.
pub fn build(config: &AppConfig) -> Result<Orchestrator> {
    let runner = HttpModelRunner::new(&config.model)?;
    info!("Model endpoint: {}", runner.endpoint());
    build_with_runner(config, Arc::new(runner))
}
