//! Mutex-guarded cache handle for use from async services.

use super::bounded_cache::{BoundedCache, CacheConfig};
use super::clock::Clock;
use crate::metrics::Metrics;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Point-in-time view of a cache instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub name: String,
    pub entries: usize,
    pub capacity: Option<usize>,
    pub ttl_secs: Option<u64>,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

type Flights<K> = Mutex<HashMap<K, Arc<AsyncMutex<()>>>>;

/// A [`BoundedCache`] behind a single mutex.
///
/// Clones share the same underlying cache. Every operation takes the lock
/// once and releases it before returning; the lock is never held while a
/// value is being computed.
///
/// The `get_or_*` methods are single-flight: concurrent callers missing on
/// the same key wait for one computation instead of starting their own.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<BoundedCache<K, V>>>,
    flights: Arc<Flights<K>>,
    name: &'static str,
    metrics: Metrics,
    shared_metrics: Option<Metrics>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            flights: Arc::clone(&self.flights),
            name: self.name,
            metrics: self.metrics.clone(),
            shared_metrics: self.shared_metrics.clone(),
        }
    }
}

/// Holds the per-key gate while a value is computed.
///
/// Dropping it (including on cancellation) unregisters the gate so a later
/// miss starts a new flight.
struct Flight<'a, K: Eq + Hash> {
    flights: &'a Flights<K>,
    key: K,
    gate: Arc<AsyncMutex<()>>,
    _guard: OwnedMutexGuard<()>,
}

impl<K: Eq + Hash> Drop for Flight<'_, K> {
    fn drop(&mut self) {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        if flights
            .get(&self.key)
            .is_some_and(|gate| Arc::ptr_eq(gate, &self.gate))
        {
            flights.remove(&self.key);
        }
    }
}

enum Lookup<'a, K: Eq + Hash, V> {
    Cached(V),
    Compute(Flight<'a, K>),
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a named cache that reads time from the system clock.
    pub fn new(name: &'static str, config: CacheConfig) -> Self {
        Self::from_cache(name, BoundedCache::new(config))
    }

    /// Create a named cache with an explicit time source.
    pub fn with_clock(name: &'static str, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_cache(name, BoundedCache::with_clock(config, clock))
    }

    fn from_cache(name: &'static str, cache: BoundedCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
            flights: Arc::new(Mutex::new(HashMap::new())),
            name,
            metrics: Metrics::new(),
            shared_metrics: None,
        }
    }

    /// Also record hits and misses into a process-wide collector.
    ///
    /// [`stats`](Self::stats) keeps reporting this cache's own counters.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.shared_metrics = Some(metrics);
        self
    }

    // Every mutation is a single non-panicking step, so a poisoned lock still
    // guards a consistent cache.
    fn lock(&self) -> MutexGuard<'_, BoundedCache<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, hit: bool) {
        for metrics in std::iter::once(&self.metrics).chain(self.shared_metrics.as_ref()) {
            if hit {
                metrics.record_cache_hit();
            } else {
                metrics.record_cache_miss();
            }
        }
        if hit {
            tracing::trace!(cache = self.name, "Cache hit");
        } else {
            tracing::trace!(cache = self.name, "Cache miss");
        }
    }

    /// Get a clone of a live value, recording a hit or miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.lock().get(key).cloned();
        self.record(value.is_some());
        value
    }

    fn peek(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Store a value (see [`BoundedCache::put`]).
    pub fn put(&self, key: K, value: V) {
        self.lock().put(key, value);
    }

    /// Wait for any in-flight computation of `key`, then return either the
    /// value it stored or a [`Flight`] that makes this caller the computer.
    async fn begin_flight(&self, key: &K) -> Lookup<'_, K, V> {
        if let Some(value) = self.peek(key) {
            self.record(true);
            return Lookup::Cached(value);
        }

        let gate = {
            let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(flights.entry(key.clone()).or_default())
        };
        let guard = Arc::clone(&gate).lock_owned().await;

        match self.get(key) {
            Some(value) => Lookup::Cached(value),
            None => Lookup::Compute(Flight {
                flights: &*self.flights,
                key: key.clone(),
                gate,
                _guard: guard,
            }),
        }
    }

    /// Return the cached value for `key`, or compute, store, and return it.
    ///
    /// The boolean is `true` when the value came from the cache, including
    /// when it was computed by a concurrent caller this one waited for.
    pub async fn get_or_insert_with<F, Fut>(&self, key: K, compute: F) -> (V, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let flight = match self.begin_flight(&key).await {
            Lookup::Cached(value) => return (value, true),
            Lookup::Compute(flight) => flight,
        };
        let value = compute().await;
        self.put(key, value.clone());
        drop(flight);
        (value, false)
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), but errors are
    /// returned to the caller and never stored. Callers waiting on a failed
    /// computation run their own.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, compute: F) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let flight = match self.begin_flight(&key).await {
            Lookup::Cached(value) => return Ok((value, true)),
            Lookup::Compute(flight) => flight,
        };
        let value = compute().await?;
        self.put(key, value.clone());
        drop(flight);
        Ok((value, false))
    }

    /// Check for a live entry without touching hit/miss counters.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().contains_key(key)
    }

    /// Remove a specific key.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().remove(key)
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Physically drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let removed = self.lock().purge_expired();
        if removed > 0 {
            tracing::debug!(cache = self.name, removed, "Purged expired cache entries");
        }
        removed
    }

    /// Number of tracked entries, including expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Name used in logs and stats.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Hit/miss collector for this cache.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Snapshot of size, limits, and hit counters.
    pub fn stats(&self) -> CacheStats {
        let (entries, capacity, ttl) = {
            let cache = self.lock();
            (cache.len(), cache.capacity(), cache.ttl())
        };
        CacheStats {
            name: self.name.to_string(),
            entries,
            capacity,
            ttl_secs: ttl.map(|d| d.as_secs()),
            hits: self.metrics.cache_hits_total(),
            misses: self.metrics.cache_misses_total(),
            hit_rate: self.metrics.cache_hit_rate(),
        }
    }
}

impl<K, V> std::fmt::Debug for SharedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("name", &self.name)
            .field("inner", &*self.inner.lock().unwrap_or_else(PoisonError::into_inner))
            .finish()
    }
}
