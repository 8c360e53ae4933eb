// Response cache tests - testing only public APIs
// Author: kelexine (https://github.com/kelexine)

use chrono::{Duration, Utc};
use promptgate::cache::{CacheConfig, CacheEntry, CacheKey, InMemoryCache, ResponseCache};
use proptest::prelude::*;

#[tokio::test]
async fn test_cache_stats_initialization() {
    let cache = InMemoryCache::new();
    let stats = cache.stats().unwrap();

    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.writes, 0);
    assert_eq!(stats.entries, 0);
}

#[test]
fn test_cache_config_defaults() {
    let config = CacheConfig::default();

    assert!(config.enabled); // Should be enabled by default
    assert_eq!(config.ttl_seconds, 3600);
    assert_eq!(config.key_prefix_chars, 100);
}

#[tokio::test]
async fn test_set_get_and_overwrite() {
    let cache = InMemoryCache::new();
    let key = CacheKey::derive("m1", "Explain X", 100);

    cache.set(&key, "first", 60).await.unwrap();
    cache.set(&key, "second", 60).await.unwrap();

    assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("second"));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().unwrap().writes, 2);
}

#[tokio::test]
async fn test_expired_entry_is_absent_and_removed() {
    let cache = InMemoryCache::new();
    let key = CacheKey::derive("m1", "Explain X", 100);
    cache.insert_entry(
        &key,
        CacheEntry {
            value: "old".to_string(),
            expires_at: Utc::now() - Duration::milliseconds(1),
        },
    );

    assert_eq!(cache.get(&key).await.unwrap(), None);
    assert!(cache.peek(&key).is_none());

    let stats = cache.stats().unwrap();
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_entry_expires_at_boundary() {
    let now = Utc::now();
    let entry = CacheEntry::new("v", 10, now);

    assert!(!entry.is_expired_at(now + Duration::seconds(9)));
    assert!(entry.is_expired_at(now + Duration::seconds(10)));
}

#[test]
fn test_huge_ttl_saturates() {
    let entry = CacheEntry::new("v", u64::MAX, Utc::now());
    assert!(!entry.is_expired_at(Utc::now() + Duration::days(365 * 100)));
}

#[tokio::test]
async fn test_clear_empties_cache() {
    let cache = InMemoryCache::new();
    for prompt in ["a", "b", "c"] {
        let key = CacheKey::derive("m1", prompt, 100);
        cache.set(&key, prompt, 60).await.unwrap();
    }
    assert_eq!(cache.len(), 3);

    cache.clear().await.unwrap();
    assert!(cache.is_empty());
}

#[test]
fn test_key_format() {
    let key = CacheKey::derive("llama3", "hello", 100);
    let (model, digest) = key.as_str().split_once(':').unwrap();

    assert_eq!(model, "llama3");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

proptest! {
    #[test]
    fn prop_key_is_deterministic(model in "[a-z0-9]{1,12}", prompt in ".{0,300}") {
        prop_assert_eq!(
            CacheKey::derive(&model, &prompt, 100),
            CacheKey::derive(&model, &prompt, 100)
        );
    }

    #[test]
    fn prop_key_ignores_text_past_prefix(
        prefix in "[a-zA-Z ]{100}",
        tail_a in ".{0,50}",
        tail_b in ".{0,50}",
    ) {
        let a = format!("{}{}", prefix, tail_a);
        let b = format!("{}{}", prefix, tail_b);
        prop_assert_eq!(CacheKey::derive("m", &a, 100), CacheKey::derive("m", &b, 100));
    }

    #[test]
    fn prop_key_separates_models(prompt in ".{0,120}", a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assume!(a != b);
        prop_assert_ne!(CacheKey::derive(&a, &prompt, 100), CacheKey::derive(&b, &prompt, 100));
    }
}
