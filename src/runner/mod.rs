//! Model invocation.
//!
//! The orchestrator treats a [`ModelRunner`] as a black box that turns a model
//! name, a prompt and merged parameters into text. The only assumption made
//! about upstream payloads lives in [`extract_text`].
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod http;

pub use http::HttpModelRunner;

use crate::error::Result;
use crate::models::GenerationParams;
use async_trait::async_trait;
use serde_json::Value;

/// Runs a named model against a prompt.
///
/// Failures should be [`GatewayError::UpstreamFailure`](crate::error::GatewayError);
/// the orchestrator reports any other variant as one anyway. Retrying is the
/// runner's business, never the orchestrator's.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    async fn run(&self, model: &str, prompt: &str, params: &GenerationParams) -> Result<String>;
}

/// Fields tried, in order, when pulling generated text out of a payload.
const TEXT_FIELDS: &[&str] = &["result", "response", "text", "output", "content"];

/// Pull the generated text out of an arbitrary upstream payload.
///
/// A bare JSON string is used as is. Otherwise the first string found among the
/// well-known result fields wins, then OpenAI-style `choices[0]`. Anything else
/// is returned as the serialized payload.
pub fn extract_text(payload: &Value) -> String {
    if let Some(text) = payload.as_str() {
        return text.to_string();
    }

    for field in TEXT_FIELDS {
        if let Some(text) = payload.get(*field).and_then(Value::as_str) {
            return text.to_string();
        }
    }

    if let Some(choice) = payload.get("choices").and_then(|c| c.get(0)) {
        if let Some(text) = choice.get("text").and_then(Value::as_str) {
            return text.to_string();
        }
        if let Some(text) = choice.pointer("/message/content").and_then(Value::as_str) {
            return text.to_string();
        }
    }

    payload.to_string()
}
