//! Per-policy operation counters, behind the `metrics` cargo feature.
//!
//! Each policy embeds a [`PolicyMetrics`] and records one event per
//! externally observable transition: hits, misses, inserts, updates,
//! evictions, and removals. [`snapshot`](PolicyMetrics::snapshot) produces
//! an owned [`MetricsSnapshot`] that can be compared, logged, or exported
//! without holding the cache lock.
//!
//! Counters live inside the policy core, so they are covered by whatever
//! synchronization guards the core itself — no atomics needed.
//!
//! ## Example
//!
//! ```
//! use cachemux::policy::lru::LruCache;
//! use cachemux::traits::CachePolicy;
//!
//! let mut cache = LruCache::try_new(2).unwrap();
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.try_get(&1);
//! cache.try_get(&9);
//! cache.put(3, "c"); // evicts key 2
//!
//! let snap = cache.metrics_snapshot();
//! assert_eq!(snap.hits, 1);
//! assert_eq!(snap.misses, 1);
//! assert_eq!(snap.inserts, 3);
//! assert_eq!(snap.evictions, 1);
//! ```

/// Running operation counters for one policy instance.
#[derive(Debug, Default, Clone)]
pub struct PolicyMetrics {
    hits: u64,
    misses: u64,
    inserts: u64,
    updates: u64,
    evictions: u64,
    removals: u64,
}

impl PolicyMetrics {
    #[inline]
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    #[inline]
    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    #[inline]
    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    #[inline]
    pub(crate) fn record_update(&mut self) {
        self.updates += 1;
    }

    #[inline]
    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    #[inline]
    pub(crate) fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Produces an owned snapshot of the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits,
            misses: self.misses,
            inserts: self.inserts,
            updates: self.updates,
            evictions: self.evictions,
            removals: self.removals,
        }
    }

    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Point-in-time copy of a policy's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Reads that found the key among live entries.
    pub hits: u64,
    /// Reads that did not (ghost hits count as misses).
    pub misses: u64,
    /// `put` calls that created a new entry.
    pub inserts: u64,
    /// `put` calls that overwrote an existing entry.
    pub updates: u64,
    /// Entries displaced by the policy to make room.
    pub evictions: u64,
    /// Entries erased by explicit `remove`.
    pub removals: u64,
}

impl MetricsSnapshot {
    /// Fraction of reads that hit, or `None` before the first read.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f64 / total as f64)
        }
    }
}
