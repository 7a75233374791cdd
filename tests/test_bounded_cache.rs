//! Behavioral tests for the bounded TTL cache.
//!
//! Time is driven by a manual clock so expiry boundaries are exact.

use std::sync::Arc;
use std::time::Duration;
use trip_planner::cache::{BoundedCache, CacheConfig, CacheKey, ManualClock, SharedCache};

fn cache(capacity: usize, ttl_secs: u64) -> (BoundedCache<String, String>, ManualClock) {
    let clock = ManualClock::new();
    let cache = BoundedCache::with_clock(
        CacheConfig::new(capacity, Duration::from_secs(ttl_secs)),
        Arc::new(clock.clone()),
    );
    (cache, clock)
}

fn put(cache: &mut BoundedCache<String, String>, key: &str, value: &str) {
    cache.put(key.to_string(), value.to_string());
}

#[test]
fn test_put_then_get_returns_value() {
    let (mut cache, _clock) = cache(10, 3600);

    for (key, value) in [("a", "1"), ("b", "2"), ("a", "3")] {
        put(&mut cache, key, value);
        assert_eq!(cache.get(key).map(String::as_str), Some(value));
    }
}

#[test]
fn test_entry_expires_after_ttl() {
    let (mut cache, clock) = cache(10, 60);
    put(&mut cache, "k", "v");

    clock.set_elapsed(Duration::from_millis(59_999));
    assert_eq!(cache.get("k").map(String::as_str), Some("v"));

    clock.set_elapsed(Duration::from_millis(60_001));
    assert_eq!(cache.get("k"), None);

    // Logically absent but still occupying a slot
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_capacity_evicts_oldest_inserted() {
    let (mut cache, _clock) = cache(3, 3600);
    for key in ["k1", "k2", "k3", "k4"] {
        put(&mut cache, key, key);
    }

    assert_eq!(cache.get("k1"), None);
    for key in ["k2", "k3", "k4"] {
        assert_eq!(cache.get(key).map(String::as_str), Some(key));
    }
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_reads_do_not_protect_from_eviction() {
    let (mut cache, _clock) = cache(2, 3600);
    put(&mut cache, "a", "1");
    put(&mut cache, "b", "2");

    // Frequent reads would save "a" under LRU, not under FIFO
    for _ in 0..10 {
        assert!(cache.get("a").is_some());
    }
    put(&mut cache, "c", "3");

    assert_eq!(cache.get("a"), None);
    assert!(cache.get("b").is_some());
}

#[test]
fn test_overwrite_keeps_original_eviction_slot() {
    let (mut cache, _clock) = cache(3, 3600);
    put(&mut cache, "k", "old");
    put(&mut cache, "x", "1");
    put(&mut cache, "y", "2");

    // At capacity: overwriting an existing key evicts nothing
    put(&mut cache, "k", "new");
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("k").map(String::as_str), Some("new"));

    // "k" is still the oldest insertion, so it goes first
    put(&mut cache, "z", "3");
    assert_eq!(cache.get("k"), None);
    assert!(cache.get("x").is_some());
    assert!(cache.get("y").is_some());
    assert!(cache.get("z").is_some());
}

#[test]
fn test_overwrite_refreshes_age() {
    let (mut cache, clock) = cache(3, 10);
    put(&mut cache, "k", "v1");
    clock.advance(Duration::from_secs(9));
    put(&mut cache, "k", "v2");
    clock.advance(Duration::from_secs(9));

    assert_eq!(cache.get("k").map(String::as_str), Some("v2"));
}

#[test]
fn test_raw_keys_are_exact() {
    let (mut cache, _clock) = cache(10, 3600);
    put(&mut cache, "Paris", "v");

    assert_eq!(cache.get("paris "), None);
    assert_eq!(cache.get("Paris").map(String::as_str), Some("v"));
}

#[test]
fn test_normalized_keys_match() {
    let clock = ManualClock::new();
    let mut cache = BoundedCache::with_clock(
        CacheConfig::new(10, Duration::from_secs(3600)),
        Arc::new(clock),
    );
    cache.put(CacheKey::trip("Paris", 3), "plan");

    assert_eq!(cache.get(&CacheKey::trip("paris ", 3)), Some(&"plan"));
    assert_eq!(cache.get("paris_3"), Some(&"plan"));
    assert_eq!(cache.get(&CacheKey::trip("paris", 4)), None);
}

#[test]
fn test_scenario_plan_cache_eviction() {
    let (mut cache, clock) = cache(2, 3600);

    put(&mut cache, "paris_3", "R1");
    clock.set_elapsed(Duration::from_secs(1));
    put(&mut cache, "tokyo_5", "R2");
    clock.set_elapsed(Duration::from_secs(2));
    put(&mut cache, "rome_2", "R3");

    assert_eq!(cache.get("paris_3"), None);
    assert_eq!(cache.get("tokyo_5").map(String::as_str), Some("R2"));
    assert_eq!(cache.get("rome_2").map(String::as_str), Some("R3"));
}

#[test]
fn test_scenario_search_cache_expiry() {
    let (mut cache, clock) = cache(10, 3600);
    let key = CacheKey::query("Eiffel Tower", 2);
    assert_eq!(key.as_str(), "eiffel tower_2");

    put(&mut cache, key.as_str(), "A");

    clock.set_elapsed(Duration::from_secs(3599));
    assert_eq!(cache.get(key.as_str()).map(String::as_str), Some("A"));

    clock.set_elapsed(Duration::from_secs(3601));
    assert_eq!(cache.get(key.as_str()), None);
}

#[tokio::test]
async fn test_shared_cache_computes_once_per_key() {
    let cache: SharedCache<CacheKey, usize> = SharedCache::new(
        "test",
        CacheConfig::new(10, Duration::from_secs(3600)),
    );

    let mut computed = 0;
    for _ in 0..3 {
        let (value, _) = cache
            .get_or_insert_with(CacheKey::query("louvre", 2), || {
                computed += 1;
                async { 42 }
            })
            .await;
        assert_eq!(value, 42);
    }

    assert_eq!(computed, 1);
    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_shared_cache_does_not_store_errors() {
    let cache: SharedCache<String, String> = SharedCache::new(
        "test",
        CacheConfig::new(10, Duration::from_secs(3600)),
    );

    let first: Result<_, &str> = cache
        .get_or_try_insert_with("k".to_string(), || async { Err("upstream down") })
        .await;
    assert!(first.is_err());
    assert!(cache.is_empty());

    let second: Result<_, &str> = cache
        .get_or_try_insert_with("k".to_string(), || async { Ok("fresh".to_string()) })
        .await;
    assert_eq!(second.unwrap(), ("fresh".to_string(), false));
}
