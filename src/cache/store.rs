//! Cache Store Module
//!
//! Main cache engine: a mutex-guarded HashMap of TTL-stamped entries
//! with two-phase (expire-then-sample) eviction on insert.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::entry::Entry;
use crate::cache::{CacheStats, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::clock::{Clock, SystemClock};

// == Guarded State ==
/// Everything serialized by the cache lock: the backing map and the
/// counters that must stay consistent with it.
#[derive(Debug)]
struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    stats: CacheStats,
}

// == Cache ==
/// A thread-safe, capacity-bounded key/value cache with per-entry TTL.
///
/// All operations take `&self` and serialize on a single internal lock,
/// so a `Cache` can be shared across threads behind an [`Arc`] without
/// further synchronization. Values are returned by clone; no internal
/// state ever escapes the lock by reference.
///
/// When an insert finds the cache at capacity, expired entries are
/// dropped first; if that is not enough, an arbitrary half of the
/// remaining entries is evicted in bulk. The cache deliberately keeps
/// no access-order bookkeeping, so which live entries survive a bulk
/// eviction is unspecified.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use expiring_cache::Cache;
///
/// let cache = Cache::new()
///     .with_capacity(64)
///     .with_ttl(Duration::from_secs(30));
///
/// cache.add("session", 42);
/// assert_eq!(cache.get("session"), Some(42));
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: Mutex<Inner<K, V>>,
    ttl: Duration,
    capacity: usize,
    keep_alive: bool,
    clock: Arc<dyn Clock>,
}

impl<K, V> Cache<K, V> {
    // == Constructor ==
    /// Creates a cache with the default configuration: capacity
    /// [`DEFAULT_CAPACITY`], TTL [`DEFAULT_TTL`], absolute expiration,
    /// system clock.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(DEFAULT_CAPACITY),
                stats: CacheStats::new(),
            }),
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
            keep_alive: false,
            clock: Arc::new(SystemClock),
        }
    }

    // == Configuration ==
    // The setters consume and return the cache, so configuration is
    // finished before the value can be shared between threads.

    /// Sets the maximum number of entries.
    ///
    /// A zero capacity would make the bound meaningless; it is clamped
    /// to one entry.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Sets the time-to-live applied to every inserted entry.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Switches between sliding expiration (`true`: every successful
    /// read pushes the entry's expiration out by the TTL) and absolute
    /// expiration (`false`: the expiration is fixed at insert).
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Replaces the time source, mainly for deterministic tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included
    /// until they are touched or swept by an eviction pass.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.entries = inner.entries.len();
        stats
    }

    // == Clear ==
    /// Removes every entry. The cache stays usable; cumulative
    /// counters are not reset.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.entries.len();
        inner.entries.clear();
        debug!(dropped, "cache cleared");
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Add ==
    /// Inserts `value` under `key`, replacing any existing entry and
    /// stamping it with `now + ttl`.
    ///
    /// If the cache is at capacity, a bulk eviction runs first: every
    /// expired entry is dropped, then, if still at capacity, an
    /// arbitrary `capacity / 2` of the remaining entries. Evicting
    /// unrelated entries is an intended side effect of insertion.
    pub fn add(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.entries.len() >= self.capacity {
            self.evict(inner, now);
        }

        inner.entries.insert(key, Entry::new(value, now, self.ttl));
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`, or `None` if
    /// the key is absent or its TTL has elapsed.
    ///
    /// An expired entry is removed on the spot (lazy expiration);
    /// absent and expired keys are indistinguishable to the caller.
    /// With keep-alive enabled, a successful read pushes the entry's
    /// expiration out by the TTL.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Some(entry) = inner.entries.get_mut(key) {
            if !entry.is_expired(now) {
                if self.keep_alive {
                    entry.refresh(now, self.ttl);
                }
                let value = entry.value.clone();
                trace!(
                    remaining_ms = entry.remaining(now).as_millis() as u64,
                    "cache hit"
                );
                inner.stats.record_hit();
                return Some(value);
            }
        }

        // Absent, or present but past its TTL.
        if inner.entries.remove(key).is_some() {
            inner.stats.record_expirations(1);
        }
        inner.stats.record_miss();
        None
    }

    // == Remove ==
    /// Deletes the entry for `key`. Removing an absent key is a no-op.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().entries.remove(key);
    }

    // == Eviction ==
    /// Two-phase bulk eviction, run only from [`add`](Cache::add) when
    /// the store is at capacity.
    ///
    /// Phase 1 drops every entry whose TTL has elapsed. Phase 2 runs
    /// only if the store is still at capacity and drops `capacity / 2`
    /// entries (at least one, so the bound holds for tiny capacities)
    /// in whatever order the map yields them.
    fn evict(&self, inner: &mut Inner<K, V>, now: Instant) {
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));

        let expired = before - inner.entries.len();
        if expired > 0 {
            inner.stats.record_expirations(expired as u64);
            debug!(expired, "eviction: dropped expired entries");
        }

        if inner.entries.len() < self.capacity {
            return;
        }

        let sample = (self.capacity / 2).max(1);
        let doomed: Vec<K> = inner.entries.keys().take(sample).cloned().collect();
        for key in &doomed {
            inner.entries.remove(key);
        }
        inner.stats.record_evictions(doomed.len() as u64);
        debug!(evicted = doomed.len(), "eviction: sampled out live entries");
    }
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
