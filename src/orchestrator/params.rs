// Generation parameter merging
// Author: kelexine (https://github.com/kelexine)

use crate::models::{AcceptedRequest, GenerationParams};
use crate::remote_config::ConfigDocument;

/// Merge field by field: request value, then configured value, then default.
pub fn merge_params(
    request: &AcceptedRequest,
    document: &ConfigDocument,
    defaults: &GenerationParams,
) -> GenerationParams {
    GenerationParams {
        temperature: request
            .temperature()
            .or_else(|| document.temperature())
            .unwrap_or(defaults.temperature),
        max_tokens: request
            .max_tokens()
            .or_else(|| document.max_tokens())
            .unwrap_or(defaults.max_tokens),
    }
}
