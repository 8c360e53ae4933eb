// Cache key derivation
// Author: kelexine (https://github.com/kelexine)
//
// Keys hash the model name together with a bounded prefix of the prompt.
// Prompts that share the first `prefix_chars` characters under the same model
// collide on purpose; `prefix_chars == 0` hashes the whole prompt instead.

use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic cache key for a (model, prompt) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key from the model name and the first `prefix_chars` characters
    /// of the prompt. Characters are Unicode scalar values, not bytes.
    pub fn derive(model: &str, prompt: &str, prefix_chars: usize) -> Self {
        let prefix = prompt_prefix(prompt, prefix_chars);

        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        // Separator keeps ("ab", "c") and ("a", "bc") apart
        hasher.update([0u8]);
        hasher.update(prefix.as_bytes());

        CacheKey(format!("{}:{:x}", model, hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Slice the prompt down to at most `prefix_chars` characters.
fn prompt_prefix(prompt: &str, prefix_chars: usize) -> &str {
    if prefix_chars == 0 {
        return prompt;
    }
    match prompt.char_indices().nth(prefix_chars) {
        Some((byte_idx, _)) => &prompt[..byte_idx],
        None => prompt,
    }
}
