//! # Adaptive Replacement Cache (ARC)
//!
//! Self-tuning partition between a recency list and a frequency list,
//! steered by two ghost lists of recently evicted keys.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────────┐
//!   │                          ArcCache<K, V>                             │
//!   │                                                                     │
//!   │   map: FxHashMap<K, Entry { value, list: T1|T2, node }>             │
//!   │                                                                     │
//!   │   T1 (seen once, recency)          T2 (seen again, frequency)       │
//!   │   ┌───────────────────────┐        ┌───────────────────────┐        │
//!   │   │ MRU ──► ... ──► LRU   │        │ MRU ──► ... ──► LRU   │        │
//!   │   └──────────────┬────────┘        └─────────────┬─────────┘        │
//!   │        evict     │      |T1| + |T2| <= C         │    evict         │
//!   │                  ▼                               ▼                  │
//!   │   B1 (ghosts of T1)                B2 (ghosts of T2)                │
//!   │   ┌───────────────────────┐        ┌───────────────────────┐        │
//!   │   │ keys only, <= C       │        │ keys only, <= C       │        │
//!   │   └───────────────────────┘        └───────────────────────┘        │
//!   │                                                                     │
//!   │   p: target size of T1, 0 <= p <= C, starts at 0                    │
//!   │     B1 hit -> p grows   (recency is paying off)                     │
//!   │     B2 hit -> p shrinks (frequency is paying off)                   │
//!   └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation outline
//!
//! - Hit in T1 or T2: move to T2 MRU (a second touch proves reuse).
//! - Ghost hit in B1/B2: drop the ghost, nudge `p`, run the replacement
//!   routine, and — on `put` — insert the key at T2 MRU. A `get` that hits
//!   a ghost still reports a miss: ghost records carry no value, the
//!   adaptation is the only effect.
//! - Fresh key: make room per the ARC meta-rule, insert at T1 MRU.
//!
//! `replace` picks the victim side by comparing `|T1|` against `p`, pushes
//! the victim key onto the matching ghost list, and keeps both ghost lists
//! bounded by the capacity.
//!
//! Capacity 0 is legal and degenerate: every `put` is a no-op and every
//! `get` misses.
//!
//! ## Example
//!
//! ```
//! use cachemux::policy::arc::ArcCache;
//! use cachemux::traits::CachePolicy;
//!
//! let mut cache = ArcCache::new(2);
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.put(3, "c");             // evicts 1 into the B1 ghost list
//!
//! cache.put(1, "a");             // ghost hit: re-admitted straight into T2
//! assert_eq!(cache.t2_len(), 1);
//! assert!(cache.p() > 0);        // and the recency side gained budget
//! ```
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement
//!   Cache", FAST 2003

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::ghost_list::GhostList;
use crate::ds::key_list::{NodeHandle, OrderedKeyList};
#[cfg(feature = "metrics")]
use crate::metrics::{MetricsSnapshot, PolicyMetrics};
use crate::traits::CachePolicy;

/// Which real list an entry currently resides in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ListKind {
    T1,
    T2,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    list: ListKind,
    node: NodeHandle,
}

/// Adaptive Replacement Cache.
///
/// # Example
///
/// ```
/// use cachemux::policy::arc::ArcCache;
/// use cachemux::traits::CachePolicy;
///
/// let mut cache = ArcCache::new(100);
/// cache.put("page", "content");
/// assert_eq!(cache.t1_len(), 1);     // first touch lands in T1
///
/// cache.try_get(&"page");
/// assert_eq!(cache.t2_len(), 1);     // second touch promotes to T2
/// ```
#[derive(Debug)]
pub struct ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, Entry<V>>,
    t1: OrderedKeyList<K>,
    t2: OrderedKeyList<K>,
    b1: GhostList<K>,
    b2: GhostList<K>,
    p: usize,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: PolicyMetrics,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an ARC cache with the given capacity.
    ///
    /// Capacity 0 is legal: the instance always misses and never stores.
    /// Ghost lists each hold up to `capacity` keys; `p` starts at 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            t1: OrderedKeyList::with_capacity(capacity),
            t2: OrderedKeyList::with_capacity(capacity),
            b1: GhostList::new(capacity),
            b2: GhostList::new(capacity),
            p: 0,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: PolicyMetrics::default(),
        }
    }

    /// Current adaptation target: the preferred size of T1.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Number of entries in T1 (seen once recently).
    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    /// Number of entries in T2 (seen more than once).
    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    /// Number of ghost keys in B1.
    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    /// Number of ghost keys in B2.
    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    /// Returns `true` if `key` is live (in T1 or T2).
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Current counter values. Only with the `metrics` feature.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Moves a live entry to the MRU position of T2.
    fn promote_to_t2(&mut self, key: &K) {
        let Some(entry) = self.map.get(key) else {
            return;
        };
        let node = entry.node;
        match entry.list {
            ListKind::T1 => self.t1.detach(node),
            ListKind::T2 => self.t2.detach(node),
        };
        let new_node = self.t2.push_front(key.clone());
        if let Some(entry) = self.map.get_mut(key) {
            entry.list = ListKind::T2;
            entry.node = new_node;
        }
    }

    /// Inserts a fresh entry at the MRU position of the given list.
    fn insert_mru(&mut self, key: K, value: V, list: ListKind) {
        let node = match list {
            ListKind::T1 => self.t1.push_front(key.clone()),
            ListKind::T2 => self.t2.push_front(key.clone()),
        };
        self.map.insert(key, Entry { value, list, node });
        #[cfg(feature = "metrics")]
        self.metrics.record_insert();
    }

    /// On a B1 hit: grow `p` by `max(1, |B2| / |B1|)`, capped at capacity.
    fn adapt_on_b1_hit(&mut self) {
        let delta = (self.b2.len() / self.b1.len().max(1)).max(1);
        self.p = (self.p + delta).min(self.capacity);
    }

    /// On a B2 hit: shrink `p` by `max(1, |B1| / |B2|)`, floored at 0.
    fn adapt_on_b2_hit(&mut self) {
        let delta = (self.b1.len() / self.b2.len().max(1)).max(1);
        self.p = self.p.saturating_sub(delta);
    }

    /// Evicts one entry from T1 or T2 into the matching ghost list.
    ///
    /// T1 is chosen when it is non-empty and oversized relative to `p`
    /// (strictly, or exactly at `p` when the trigger was a B1 hit). When
    /// the preferred side is empty the other side is used, so a needed
    /// eviction never silently fails.
    fn replace(&mut self, hit_in_b1: bool) {
        let t1_len = self.t1.len();
        let from_t1 = if t1_len > 0 && (t1_len > self.p || (hit_in_b1 && t1_len == self.p)) {
            true
        } else if !self.t2.is_empty() {
            false
        } else {
            t1_len > 0
        };

        let victim = if from_t1 {
            self.t1.pop_back()
        } else {
            self.t2.pop_back()
        };
        let Some(victim) = victim else {
            return;
        };

        self.map.remove(&victim);
        if from_t1 {
            self.b1.record(victim);
        } else {
            self.b2.record(victim);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.map.len(), self.t1.len() + self.t2.len());
        assert!(self.t1.len() + self.t2.len() <= self.capacity);
        assert!(self.b1.len() <= self.capacity);
        assert!(self.b2.len() <= self.capacity);
        assert!(self.p <= self.capacity);

        for key in self.t1.iter() {
            let entry = self.map.get(key).expect("T1 key missing from index");
            assert_eq!(entry.list, ListKind::T1);
            assert!(self.t1.get(entry.node) == Some(key));
        }
        for key in self.t2.iter() {
            let entry = self.map.get(key).expect("T2 key missing from index");
            assert_eq!(entry.list, ListKind::T2);
            assert!(self.t2.get(entry.node) == Some(key));
        }

        // T1, T2, B1, B2 are pairwise disjoint.
        for key in self.map.keys() {
            assert!(!self.b1.contains(key), "live key is also a B1 ghost");
            assert!(!self.b2.contains(key), "live key is also a B2 ghost");
        }

        self.t1.debug_validate_invariants();
        self.t2.debug_validate_invariants();
        self.b1.debug_validate_invariants();
        self.b2.debug_validate_invariants();
    }
}

impl<K, V> CachePolicy<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        // Case 1: live entry. Update in place and prove reuse.
        if let Some(entry) = self.map.get_mut(&key) {
            entry.value = value;
            self.promote_to_t2(&key);
            #[cfg(feature = "metrics")]
            self.metrics.record_update();
            return;
        }

        // Case 2/3: ghost hit. Adapt, make room, re-admit into T2.
        if self.b1.remove(&key) {
            self.adapt_on_b1_hit();
            self.replace(true);
            self.insert_mru(key, value, ListKind::T2);
            return;
        }
        if self.b2.remove(&key) {
            self.adapt_on_b2_hit();
            self.replace(false);
            self.insert_mru(key, value, ListKind::T2);
            return;
        }

        // Case 4: fresh key. Enforce the L1 bound (|T1| + |B1| <= C) by
        // retiring B1 history first, then make room if the cache is full.
        if self.t1.len() + self.b1.len() >= self.capacity {
            if self.t1.len() < self.capacity {
                self.b1.pop_lru();
                if self.map.len() >= self.capacity {
                    self.replace(false);
                }
            } else {
                self.replace(false);
            }
        } else if self.map.len() >= self.capacity {
            self.replace(false);
        }
        self.insert_mru(key, value, ListKind::T1);

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();
    }

    fn try_get(&mut self, key: &K) -> Option<V> {
        // Live hit: copy the value out and move to T2 MRU.
        if let Some(entry) = self.map.get(key) {
            let value = entry.value.clone();
            self.promote_to_t2(key);
            #[cfg(feature = "metrics")]
            self.metrics.record_hit();
            return Some(value);
        }

        // Ghost hits adapt and evict, but cannot produce a value: the
        // caller sees a miss either way.
        if self.b1.remove(key) {
            self.adapt_on_b1_hit();
            self.replace(true);
        } else if self.b2.remove(key) {
            self.adapt_on_b2_hit();
            self.replace(false);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_miss();
        None
    }

    fn remove(&mut self, key: &K) {
        let Some(entry) = self.map.remove(key) else {
            return;
        };
        match entry.list {
            ListKind::T1 => self.t1.detach(entry.node),
            ListKind::T2 => self.t2.detach(entry.node),
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_removal();
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
    }
}
