//! Configuration data structures for the promptgate gateway.
//!
//! This module defines the schema for the process settings: the HTTP server,
//! the response cache, the upstream model runner, the remote configuration
//! source, the workflow ledger and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, timeouts).
    #[serde(default)]
    pub server: ServerConfig,

    /// Response cache settings (TTL, key derivation).
    #[serde(default)]
    pub cache: CacheConfig,

    /// Upstream model runner settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Remote generation-parameter source.
    #[serde(default)]
    pub remote_config: RemoteConfigSettings,

    /// Workflow ledger backend.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on a whole generate request, cache and model included.
    /// Exceeding it is reported to the caller as an upstream failure.
    /// Default: `120`
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Maximum accepted request body size in bytes.
    /// Default: `1 MiB`
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Settings for the upstream model endpoint and generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Generation endpoint the HTTP runner POSTs to.
    /// Default: `http://localhost:11434/api/generate`
    #[serde(default = "default_model_endpoint")]
    pub endpoint: String,

    /// Optional bearer token sent with every model call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used when the request does not name one.
    /// Default: `default`
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Per-call HTTP timeout in seconds.
    /// Default: `60`
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,

    /// Retries on transient upstream failures (429/5xx, transport errors).
    /// Default: `2`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Built-in temperature, lowest precedence.
    /// Default: `0.7`
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    /// Built-in token limit, lowest precedence.
    /// Default: `1024`
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

/// Settings for the remote configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfigSettings {
    /// Base URL of the remote store. When unset, `values` is served statically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Logical name of the document to load for each request.
    /// Default: `generation`
    #[serde(default = "default_config_name")]
    pub name: String,

    /// Fetch timeout in seconds.
    /// Default: `5`
    #[serde(default = "default_remote_timeout")]
    pub timeout_seconds: u64,

    /// Static document used when no remote store is configured.
    #[serde(default)]
    pub values: HashMap<String, serde_json::Value>,
}

/// Which ledger backend records fresh computations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    #[default]
    None,
    Memory,
    Jsonl,
}

/// Settings for the workflow ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Backend selection.
    /// Default: `none`
    #[serde(default)]
    pub backend: LedgerBackend,

    /// File used by the `jsonl` backend.
    /// Default: `~/.promptgate/workflows.jsonl`
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_model_endpoint(),
            api_key: None,
            default_model: default_model(),
            timeout_seconds: default_model_timeout(),
            max_retries: default_max_retries(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl Default for RemoteConfigSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            name: default_config_name(),
            timeout_seconds: default_remote_timeout(),
            values: HashMap::new(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::None,
            path: default_ledger_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    120
}

fn default_body_limit() -> usize {
    1024 * 1024
}

fn default_model_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "default".to_string()
}

fn default_model_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_config_name() -> String {
    "generation".to_string()
}

fn default_remote_timeout() -> u64 {
    5
}

fn default_ledger_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".promptgate")
        .join("workflows.jsonl")
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
