//! Remote generation-parameter configuration.
//!
//! A [`ConfigSource`] returns a named document of generation parameters
//! (temperature, token limits, model aliases). Any failure is reported as
//! [`SubsystemError::DegradedConfig`]; the orchestrator then carries on with
//! an empty document.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod http;

pub use http::HttpConfigSource;

use crate::error::SubsystemError;
use crate::models::request::MAX_TEMPERATURE;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Source of named configuration documents.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self, name: &str) -> Result<ConfigDocument, SubsystemError>;
}

/// Parameter name → value mapping loaded for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    values: HashMap<String, Value>,
}

impl ConfigDocument {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a document from a JSON value, which must be an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                values: map.into_iter().collect(),
            }),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// `temperature`, if present, numeric and within `[0, 2]`.
    pub fn temperature(&self) -> Option<f64> {
        let raw = self.get("temperature")?;
        match raw.as_f64() {
            Some(t) if (0.0..=MAX_TEMPERATURE).contains(&t) => Some(t),
            _ => {
                warn!("Ignoring invalid configured temperature: {}", raw);
                None
            }
        }
    }

    /// `max_tokens` (or `maxTokens`), if present and a positive integer.
    pub fn max_tokens(&self) -> Option<u32> {
        let raw = self.get("max_tokens").or_else(|| self.get("maxTokens"))?;
        match raw.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) if n > 0 => Some(n),
            _ => {
                warn!("Ignoring invalid configured max_tokens: {}", raw);
                None
            }
        }
    }

    /// `model_aliases` as alias → model name. Non-string targets are skipped.
    pub fn model_aliases(&self) -> HashMap<String, String> {
        let Some(raw) = self.get("model_aliases") else {
            return HashMap::new();
        };
        let Some(map) = raw.as_object() else {
            warn!("Ignoring non-object model_aliases");
            return HashMap::new();
        };
        map.iter()
            .filter_map(|(alias, target)| {
                target
                    .as_str()
                    .map(|t| (alias.clone(), t.to_string()))
            })
            .collect()
    }
}

/// Serves one fixed document regardless of the requested name.
///
/// Used when no remote store is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    document: ConfigDocument,
}

impl StaticConfigSource {
    pub fn new(document: ConfigDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load(&self, _name: &str) -> Result<ConfigDocument, SubsystemError> {
        Ok(self.document.clone())
    }
}
