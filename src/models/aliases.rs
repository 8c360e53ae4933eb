// Model alias resolution
// Author: kelexine (https://github.com/kelexine)

use std::collections::HashMap;
use tracing::warn;

/// Longest alias chain followed before giving up.
const MAX_ALIAS_DEPTH: usize = 8;

/// Metrics label shared by every model name that does not come from configuration.
pub const OTHER_MODEL_LABEL: &str = "other";

/// Resolve a requested model name through an alias table.
///
/// Aliases may point at other aliases. Unknown names resolve to themselves.
/// A cycle or an overly long chain stops at the last name reached.
pub fn resolve_model(requested: &str, aliases: &HashMap<String, String>) -> String {
    let mut current = requested;

    for _ in 0..MAX_ALIAS_DEPTH {
        match aliases.get(current) {
            Some(next) if next != current => current = next,
            _ => return current.to_string(),
        }
    }

    warn!(
        "Model alias chain for {} exceeds {} hops, using {}",
        requested, MAX_ALIAS_DEPTH, current
    );
    current.to_string()
}

/// Metrics label for an invocation of `resolved`.
///
/// Only names taken from configuration (the default model, alias names and
/// alias targets) get their own label. Anything a caller made up is folded
/// into [`OTHER_MODEL_LABEL`] so label cardinality stays bounded.
pub fn model_label<'a>(
    requested: &str,
    resolved: &'a str,
    aliases: &HashMap<String, String>,
    default_model: &str,
) -> &'a str {
    let configured = resolved == default_model
        || aliases.contains_key(requested)
        || aliases.values().any(|target| target == resolved);
    if configured {
        resolved
    } else {
        OTHER_MODEL_LABEL
    }
}
