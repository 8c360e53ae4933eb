// In-process response cache with lazy expiry
// Author: kelexine (https://github.com/kelexine)

use super::{CacheEntry, CacheKey, CacheStats, ResponseCache};
use crate::error::SubsystemError;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use tracing::debug;

/// Response cache held in process memory.
///
/// Expired entries are not swept; a lookup that finds one removes it and
/// reports a miss. Locks are only held inside synchronous sections, never
/// across an await.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: Mutex<CacheStats>,
}

impl InMemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a prebuilt entry, bypassing TTL computation.
    pub fn insert_entry(&self, key: &CacheKey, entry: CacheEntry) {
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Entry currently stored under `key`, expired or not.
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.read().get(key.as_str()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SubsystemError> {
        let now = Utc::now();

        let found = self.entries.read().get(key.as_str()).cloned();
        let Some(entry) = found else {
            self.stats.lock().misses += 1;
            return Ok(None);
        };

        if !entry.is_expired_at(now) {
            self.stats.lock().hits += 1;
            return Ok(Some(entry.value));
        }

        // Re-check under the write lock: a concurrent miss may have refreshed it
        let mut entries = self.entries.write();
        let still_expired = entries
            .get(key.as_str())
            .map(|current| current.is_expired_at(now))
            .unwrap_or(false);
        if still_expired {
            entries.remove(key.as_str());
            debug!("Dropped expired cache entry {}", key);
        }
        drop(entries);

        let mut stats = self.stats.lock();
        stats.misses += 1;
        if still_expired {
            stats.expired += 1;
        }
        Ok(None)
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl_seconds: u64) -> Result<(), SubsystemError> {
        let entry = CacheEntry::new(value, ttl_seconds, Utc::now());
        self.entries.write().insert(key.to_string(), entry);
        self.stats.lock().writes += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SubsystemError> {
        self.entries.write().clear();
        debug!("Cache cleared");
        Ok(())
    }

    fn stats(&self) -> Option<CacheStats> {
        let mut stats = self.stats.lock().clone();
        stats.entries = self.len();
        Some(stats)
    }
}
