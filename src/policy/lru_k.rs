//! # LRU-K admission-filtered cache
//!
//! An LRU wrapped by a hit-count admission filter. A key must be touched
//! `K` times before it is allowed into the main cache, which keeps one-shot
//! scans from flushing the resident working set.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                        LruKCache<K, V>                             │
//!   │                                                                    │
//!   │   ┌──────────────────────────────┐  promotion (hits >= K)          │
//!   │   │ history: LruCache<K, Hist>   │ ───────────────────────────┐    │
//!   │   │                              │                            │    │
//!   │   │  Hist { hits, pending }      │                            ▼    │
//!   │   │  bounded like any LRU, so    │   ┌─────────────────────────┐   │
//!   │   │  churn cannot grow it        │   │ main: LruCache<K, V>    │   │
//!   │   └──────────────────────────────┘   └─────────────────────────┘   │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The history is itself an LRU of bounded capacity: each record carries the
//! access count and the most recent pending value, so a hostile or churning
//! key stream evicts old history instead of growing without bound.
//!
//! A key enters the main cache when its hit count reaches `K` *and* a
//! pending value exists to admit. The promoted value is whatever the latest
//! `put` stored — if a later `put` overwrote the pending value before
//! promotion, the newer value wins.
//!
//! ## Example
//!
//! ```
//! use cachemux::policy::lru_k::LruKCache;
//! use cachemux::traits::CachePolicy;
//!
//! let mut cache = LruKCache::try_new(2, 8, 2).unwrap();
//!
//! cache.put(1, "a");            // 1 hit: pending, not yet resident
//! assert_eq!(cache.len(), 0);
//!
//! assert_eq!(cache.try_get(&1), Some("a")); // 2nd hit: promoted
//! assert_eq!(cache.len(), 1);
//! ```

use std::hash::Hash;

use crate::error::CacheError;
#[cfg(feature = "metrics")]
use crate::metrics::MetricsSnapshot;
use crate::policy::lru::LruCache;
use crate::traits::CachePolicy;

/// Access record for a key that has not yet been promoted.
#[derive(Debug, Clone)]
struct HistoryEntry<V> {
    hits: u64,
    pending: Option<V>,
}

/// LRU cache gated by a `K`-hit admission filter.
///
/// # Example
///
/// ```
/// use cachemux::policy::lru_k::LruKCache;
/// use cachemux::traits::CachePolicy;
///
/// let mut cache = LruKCache::try_new(4, 16, 2).unwrap();
/// cache.put(7, "cold");
/// cache.put(7, "warm"); // second touch promotes the latest value
/// assert_eq!(cache.try_get(&7), Some("warm"));
/// ```
#[derive(Debug)]
pub struct LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    main: LruCache<K, V>,
    history: LruCache<K, HistoryEntry<V>>,
    k: u64,
}

impl<K, V> LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an LRU-K cache.
    ///
    /// `capacity` bounds the main cache, `history_capacity` bounds the
    /// admission history, and `k` is the hit threshold for promotion
    /// (`k == 1` behaves like a plain LRU).
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if either capacity is 0 or `k` is 0.
    pub fn try_new(capacity: usize, history_capacity: usize, k: u64) -> Result<Self, CacheError> {
        if k == 0 {
            return Err(CacheError::invalid_capacity("LRU-K threshold must be >= 1"));
        }
        let history = LruCache::try_new(history_capacity)
            .map_err(|_| CacheError::invalid_capacity("LRU-K history capacity must be > 0"))?;
        Ok(Self {
            main: LruCache::try_new(capacity)?,
            history,
            k,
        })
    }

    /// Returns the promotion threshold `K`.
    pub fn k(&self) -> u64 {
        self.k
    }

    /// Returns `true` if `key` has been promoted into the main cache.
    pub fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    /// Returns the recorded hit count for a not-yet-promoted key.
    pub fn pending_hits(&self, key: &K) -> Option<u64> {
        self.history.peek(key).map(|entry| entry.hits)
    }

    /// Main-cache counters. Only with the `metrics` feature.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.main.metrics_snapshot()
    }

    /// Promotes `key` if its history satisfies the threshold and a pending
    /// value exists. Returns the promoted value.
    fn try_promote(&mut self, key: &K) -> Option<V> {
        let entry = self.history.peek(key)?;
        if entry.hits < self.k || entry.pending.is_none() {
            return None;
        }
        let entry = self.history.take(key)?;
        let value = entry.pending?;
        self.main.put(key.clone(), value.clone());
        Some(value)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.main.debug_validate_invariants();
        self.history.debug_validate_invariants();
    }
}

impl<K, V> CachePolicy<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        // Resident keys behave exactly like the inner LRU.
        if self.main.contains(&key) {
            self.main.put(key, value);
            return;
        }

        match self.history.get_mut(&key) {
            Some(entry) => {
                entry.hits += 1;
                entry.pending = Some(value);
            },
            None => {
                self.history.put(
                    key.clone(),
                    HistoryEntry {
                        hits: 1,
                        pending: Some(value),
                    },
                );
            },
        }

        self.try_promote(&key);
    }

    fn try_get(&mut self, key: &K) -> Option<V> {
        if let Some(value) = self.main.try_get(key) {
            return Some(value);
        }

        // A miss still counts toward admission, even for keys never put:
        // enough reads make the next put admit immediately.
        match self.history.get_mut(key) {
            Some(entry) => entry.hits += 1,
            None => self.history.put(
                key.clone(),
                HistoryEntry {
                    hits: 1,
                    pending: None,
                },
            ),
        }
        self.try_promote(key)
    }

    fn remove(&mut self, key: &K) {
        self.main.remove(key);
        self.history.remove(key);
    }

    fn len(&self) -> usize {
        self.main.len()
    }

    fn capacity(&self) -> usize {
        self.main.capacity()
    }

    fn clear(&mut self) {
        self.main.clear();
        self.history.clear();
    }
}
