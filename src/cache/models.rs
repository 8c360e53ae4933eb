//! Cache configuration, entry and statistics models.

// Author: kelexine (https://github.com/kelexine)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for the response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled. When disabled every request is a miss.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Lifetime of a stored response in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Number of prompt characters that feed the cache key. `0` hashes the
    /// whole prompt.
    #[serde(default = "default_key_prefix_chars")]
    pub key_prefix_chars: usize,
}

impl Default for CacheConfig {
    /// Provides default values for cache configuration.
    ///
    /// - `enabled`: true
    /// - `ttl_seconds`: 3600
    /// - `key_prefix_chars`: 100
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_ttl_seconds(),
            key_prefix_chars: default_key_prefix_chars(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_key_prefix_chars() -> usize {
    100
}

/// A stored response and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: impl Into<String>, ttl_seconds: u64, now: DateTime<Utc>) -> Self {
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(ttl)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// An entry is expired from its expiry instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that returned a live entry.
    pub hits: u64,
    /// Number of lookups that found nothing (expired lookups included).
    pub misses: u64,
    /// Number of entries dropped lazily because they had expired.
    pub expired: u64,
    /// Number of entries written.
    pub writes: u64,
    /// Entries currently held, expired-but-unread ones included.
    pub entries: usize,
}
