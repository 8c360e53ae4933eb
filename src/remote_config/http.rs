// HTTP-backed configuration source
// Author: kelexine (https://github.com/kelexine)

use super::{ConfigDocument, ConfigSource};
use crate::config::RemoteConfigSettings;
use crate::error::{GatewayError, Result, SubsystemError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Fetches `GET {base_url}/{name}` and expects a JSON object back.
///
/// No retries and no local caching: a failed fetch is a degraded request, not
/// something to wait on.
pub struct HttpConfigSource {
    http_client: Client,
    base_url: String,
}

impl HttpConfigSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build from settings; `None` when no remote store is configured.
    pub fn from_settings(settings: &RemoteConfigSettings) -> Result<Option<Self>> {
        settings
            .base_url
            .as_deref()
            .map(|url| Self::new(url, Duration::from_secs(settings.timeout_seconds)))
            .transpose()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn load(&self, name: &str) -> std::result::Result<ConfigDocument, SubsystemError> {
        let url = format!("{}/{}", self.base_url, name);
        debug!("Fetching configuration document from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SubsystemError::DegradedConfig(format!("fetch {} failed: {}", name, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubsystemError::DegradedConfig(format!(
                "fetch {} returned HTTP {}",
                name,
                status.as_u16()
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            SubsystemError::DegradedConfig(format!("document {} is not valid JSON: {}", name, e))
        })?;

        ConfigDocument::from_json(body).ok_or_else(|| {
            SubsystemError::DegradedConfig(format!("document {} is not a JSON object", name))
        })
    }
}
