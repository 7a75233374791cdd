//! Bounded cache with TTL expiry and FIFO eviction.
//!
//! Entries are evicted in insertion order once the capacity is reached and
//! are treated as absent once they are older than the TTL. Reads never
//! change an entry's age or its position in the eviction queue.

use super::clock::{Clock, SystemClock};
use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cache entry with a timestamp.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Size and expiry limits for a cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Maximum number of tracked entries (`None` = unbounded).
    pub capacity: Option<usize>,

    /// Maximum entry age (`None` = entries never expire).
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Bounded cache whose entries expire after `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: Some(capacity),
            ttl: Some(ttl),
        }
    }

    /// Build from raw settings where a TTL of zero seconds means "never expire".
    pub fn from_secs(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            capacity: Some(capacity),
            ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
        }
    }

    /// No capacity bound and no expiry.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Replace the capacity bound.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Replace the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// An in-memory cache bounded by entry count and entry age.
///
/// This type does no locking; wrap it in [`SharedCache`](super::SharedCache)
/// when it has to be shared between tasks.
///
/// Keys are compared exactly. Callers are responsible for normalizing
/// free-text inputs (see [`CacheKey`](super::CacheKey)); `"Paris"` and
/// `"paris"` are different keys here.
///
/// Re-inserting an existing key replaces its value and timestamp but keeps
/// its original place in the eviction queue.
pub struct BoundedCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    order: VecDeque<K>,
    capacity: Option<usize>,
    ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache that reads time from the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source.
    ///
    /// A capacity of zero is clamped to one.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: config.capacity.map(|c| c.max(1)),
            ttl: config.ttl,
            clock,
        }
    }

    /// Get a value if it exists and hasn't expired.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| &entry.value)
    }

    /// Store a value under `key`.
    ///
    /// An existing entry is overwritten in place. A new key arriving at
    /// capacity evicts the oldest-inserted entry first.
    pub fn put(&mut self, key: K, value: V) {
        let inserted_at = self.clock.now();

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.inserted_at = inserted_at;
            return;
        }

        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, CacheEntry { value, inserted_at });
    }

    /// Check if a live entry exists for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Remove an entry, returning its value whether or not it had expired.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| <K as Borrow<Q>>::borrow(k) != key);
        Some(entry.value)
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Physically drop expired entries. Returns how many were removed.
    ///
    /// Not required for correctness; `get` already ignores expired entries.
    pub fn purge_expired(&mut self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let now = self.clock.now();
        let before = self.entries.len();

        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        let entries = &self.entries;
        self.order.retain(|k| entries.contains_key(k));

        before - self.entries.len()
    }

    /// Number of tracked entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache tracks no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Entry time-to-live, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_live(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(entry.inserted_at) < ttl,
            None => true,
        }
    }
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish()
    }
}
