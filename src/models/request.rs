// Inbound request and outbound response types
// Author: kelexine (https://github.com/kelexine)

use crate::error::{GatewayError, Result, SubsystemError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest accepted sampling temperature.
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Generate request as received on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Check the request and freeze it.
    ///
    /// A blank prompt, a temperature outside `[0, 2]` or a zero token limit is
    /// rejected. A missing or blank model name falls back to `default_model`.
    pub fn validate(self, default_model: &str) -> Result<AcceptedRequest> {
        if self.prompt.trim().is_empty() {
            return Err(GatewayError::InvalidInput("prompt must not be empty".to_string()));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=MAX_TEMPERATURE).contains(&t) {
                return Err(GatewayError::InvalidInput(format!(
                    "temperature must be within [0, {}], got {}",
                    MAX_TEMPERATURE, t
                )));
            }
        }

        if self.max_tokens == Some(0) {
            return Err(GatewayError::InvalidInput(
                "maxTokens must be a positive integer".to_string(),
            ));
        }

        let model_name = self
            .model_name
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model.to_string());

        Ok(AcceptedRequest {
            prompt: self.prompt,
            model_name,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}

/// A request that passed validation. Fields are read-only from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRequest {
    prompt: String,
    model_name: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl AcceptedRequest {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }
}

/// Fully merged parameters handed to the model runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Ai,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Cache => "cache",
            ResponseSource::Ai => "ai",
        }
    }
}

/// Generate response returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub result: String,
    pub source: ResponseSource,
    pub model_name: String,
    pub timestamp: DateTime<Utc>,
    /// Subsystems that failed while serving this response without failing it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<SubsystemError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_rejected() {
        let err = GenerateRequest::new("").validate("m").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));

        let err = GenerateRequest::new("   \n\t").validate("m").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_prompt_wins_over_other_fields() {
        let err = GenerateRequest::new("")
            .with_model("m1")
            .with_temperature(0.5)
            .with_max_tokens(10)
            .validate("m")
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }

    #[test]
    fn test_temperature_range() {
        assert!(GenerateRequest::new("hi").with_temperature(0.0).validate("m").is_ok());
        assert!(GenerateRequest::new("hi").with_temperature(2.0).validate("m").is_ok());
        assert!(GenerateRequest::new("hi").with_temperature(2.01).validate("m").is_err());
        assert!(GenerateRequest::new("hi").with_temperature(-0.1).validate("m").is_err());
        assert!(GenerateRequest::new("hi").with_temperature(f64::NAN).validate("m").is_err());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        assert!(GenerateRequest::new("hi").with_max_tokens(0).validate("m").is_err());
        assert!(GenerateRequest::new("hi").with_max_tokens(1).validate("m").is_ok());
    }

    #[test]
    fn test_default_model_applied() {
        let accepted = GenerateRequest::new("hi").validate("fallback").unwrap();
        assert_eq!(accepted.model_name(), "fallback");

        let accepted = GenerateRequest::new("hi").with_model("  ").validate("fallback").unwrap();
        assert_eq!(accepted.model_name(), "fallback");

        let accepted = GenerateRequest::new("hi").with_model("m1").validate("fallback").unwrap();
        assert_eq!(accepted.model_name(), "m1");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"prompt":"p","modelName":"m1","maxTokens":5}"#).unwrap();
        assert_eq!(req.model_name.as_deref(), Some("m1"));
        assert_eq!(req.max_tokens, Some(5));
        assert_eq!(req.temperature, None);

        let missing: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.prompt.is_empty());
    }

    #[test]
    fn test_response_serialization() {
        let resp = GenerateResponse {
            result: "text".to_string(),
            source: ResponseSource::Cache,
            model_name: "m1".to_string(),
            timestamp: Utc::now(),
            degraded: Vec::new(),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["source"], "cache");
        assert_eq!(value["modelName"], "m1");
        assert!(value.get("degraded").is_none());
    }

    #[test]
    fn test_source_label_matches_wire_form() {
        for source in [ResponseSource::Cache, ResponseSource::Ai] {
            assert_eq!(serde_json::to_value(source).unwrap(), source.as_str());
        }
    }
}
