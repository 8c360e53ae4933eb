// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{GatewayError, Result};
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest, applied by the caller)
    /// 2. Environment variables (`PROMPTGATE_SECTION__KEY`)
    /// 3. Config file
    /// 4. Defaults (lowest)
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file_path = path
            .map(str::to_string)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(&file_path).required(path.is_some()))
            // Override with environment variables (prefix: PROMPTGATE_)
            .add_source(
                Environment::with_prefix("PROMPTGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| GatewayError::Internal(format!("Configuration error: {}", e)))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| GatewayError::Internal(format!("Configuration error: {}", e)))?;

        // `config` lowercases map keys; the document needs them verbatim
        if let Some(values) = Self::read_document_values(Path::new(&file_path))? {
            app_config.remote_config.values = values;
        }

        Ok(app_config)
    }

    /// Read `[remote_config.values]` straight from a TOML file, keys untouched.
    fn read_document_values(path: &Path) -> Result<Option<HashMap<String, serde_json::Value>>> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            return Ok(None);
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let table: toml::Table = toml::from_str(&contents)
            .map_err(|e| GatewayError::Internal(format!("Configuration error: {}", e)))?;

        let Some(values) = table
            .get("remote_config")
            .and_then(|section| section.get("values"))
        else {
            return Ok(None);
        };

        match serde_json::to_value(values) {
            Ok(serde_json::Value::Object(map)) => Ok(Some(map.into_iter().collect())),
            Ok(_) => Err(GatewayError::Internal(
                "Configuration error: remote_config.values must be a table".to_string(),
            )),
            Err(e) => Err(GatewayError::Internal(format!("Configuration error: {}", e))),
        }
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".promptgate")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
