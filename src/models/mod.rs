//! Data models for the generate API.
//!
//! - `request`: inbound request, validated request, merged parameters and response
//! - `aliases`: model alias resolution

// Author: kelexine (https://github.com/kelexine)

pub mod aliases;
pub mod request;

pub use aliases::{model_label, resolve_model, OTHER_MODEL_LABEL};
pub use request::{
    AcceptedRequest, GenerateRequest, GenerateResponse, GenerationParams, ResponseSource,
};
