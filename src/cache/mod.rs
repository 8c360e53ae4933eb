// Cache module - response cache contract, key derivation and in-process store
// Author: kelexine (https://github.com/kelexine)

pub mod key;
pub mod memory;
pub mod models;

pub use key::CacheKey;
pub use memory::InMemoryCache;
pub use models::{CacheConfig, CacheEntry, CacheStats};

use crate::error::SubsystemError;
use async_trait::async_trait;

/// Key-value store for generated responses.
///
/// Implementations must treat an expired entry exactly like a missing one.
/// Failures are reported as [`SubsystemError::CacheUnavailable`] and never
/// fail the request that triggered them.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a live value by key.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SubsystemError>;

    /// Store a value that expires `ttl_seconds` from now.
    async fn set(&self, key: &CacheKey, value: &str, ttl_seconds: u64) -> Result<(), SubsystemError>;

    /// Remove every entry.
    async fn clear(&self) -> Result<(), SubsystemError>;

    /// Operation counters, if the backend keeps any.
    fn stats(&self) -> Option<CacheStats> {
        None
    }
}
