// HTTP model runner
// Author: kelexine (https://github.com/kelexine)

use super::{extract_text, ModelRunner};
use crate::config::ModelConfig;
use crate::error::{GatewayError, Result};
use crate::models::GenerationParams;
use crate::utils::retry::{parse_retry_after, with_retry, AttemptError, TRANSPORT_ERROR};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Body POSTed to the generation endpoint.
#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

/// Calls a JSON generation endpoint over HTTP.
///
/// Transient failures (429, 5xx, transport errors) are retried with
/// exponential backoff up to `max_retries` times.
pub struct HttpModelRunner {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl HttpModelRunner {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> std::result::Result<serde_json::Value, AttemptError> {
        let body = RunRequest {
            model,
            prompt,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        };

        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::transport(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let text = response.text().await.unwrap_or_default();
            return Err(AttemptError::new(status.as_u16(), text).with_retry_after(retry_after));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AttemptError::transport(format!("Failed to read body: {}", e)))?;

        // Non-JSON bodies are plain generated text
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}

#[async_trait]
impl ModelRunner for HttpModelRunner {
    async fn run(&self, model: &str, prompt: &str, params: &GenerationParams) -> Result<String> {
        debug!("Invoking model {} at {}", model, self.endpoint);

        let payload = with_retry("Model invocation", self.max_retries, || {
            self.attempt(model, prompt, params)
        })
        .await
        .map_err(|err| {
            error!("Model {} failed with status {}: {}", model, err.status, err.body);
            GatewayError::UpstreamFailure(match err.status {
                TRANSPORT_ERROR => err.body,
                status => format!("HTTP {}: {}", status, err.body),
            })
        })?;

        Ok(extract_text(&payload))
    }
}
