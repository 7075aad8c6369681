//! # Least Recently Used (LRU) cache
//!
//! Recency-ordered bounded map: the foundation policy that LRU-K and the
//! sharded cache compose.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                             │
//!   │                                                                    │
//!   │   ┌──────────────────────────────────────────────────────────┐     │
//!   │   │  map: FxHashMap<K, Entry { value, node: NodeHandle }>    │     │
//!   │   │                                                          │     │
//!   │   │  ┌─────────┬──────────────────────────────────────┐      │     │
//!   │   │  │   Key   │  Entry                               │      │     │
//!   │   │  ├─────────┼──────────────────────────────────────┤      │     │
//!   │   │  │ page_1  │  { value, node ──────────────────┐   │      │     │
//!   │   │  │ page_2  │  { value, node ────────────┐     │   │      │     │
//!   │   │  └─────────┴────────────────────────────┼─────┼───┘      │     │
//!   │   └─────────────────────────────────────────┼─────┼──────────┘     │
//!   │                                             ▼     ▼                │
//!   │   ┌──────────────────────────────────────────────────────────┐     │
//!   │   │  order: OrderedKeyList<K>                                │     │
//!   │   │                                                          │     │
//!   │   │  head ──► [page_2] ◄──► [page_1] ◄── tail                │     │
//!   │   │            MRU            LRU (evicted first)            │     │
//!   │   └──────────────────────────────────────────────────────────┘     │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index and the list describe the same set of keys at all times:
//! `map.len() == order.len()`, and every list node is the unique target of
//! exactly one index entry. Every operation re-establishes that pairing
//! before returning.
//!
//! ## Operations
//!
//! | Method          | Complexity | Description                              |
//! |-----------------|------------|------------------------------------------|
//! | `put`           | O(1) avg   | Insert or update, may evict the LRU key  |
//! | `try_get`/`get` | O(1) avg   | Read, moves the entry to MRU             |
//! | `peek`          | O(1) avg   | Read without touching recency            |
//! | `touch`         | O(1) avg   | Refresh recency without reading          |
//! | `remove`        | O(1) avg   | Erase by key, silent on absent           |
//! | `pop_lru`       | O(1)       | Evict and return the LRU entry           |
//! | `peek_lru`      | O(1)       | Inspect the next victim                  |
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
//! cache.try_get(&1);  // 1 becomes MRU
//! cache.put(3, "c");  // evicts 2, the LRU key
//!
//! assert_eq!(cache.try_get(&2), None);
//! assert_eq!(cache.try_get(&1), Some("a"));
//! assert_eq!(cache.try_get(&3), Some("c"));
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::key_list::{NodeHandle, OrderedKeyList};
use crate::error::CacheError;
#[cfg(feature = "metrics")]
use crate::metrics::{MetricsSnapshot, PolicyMetrics};
use crate::traits::CachePolicy;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    node: NodeHandle,
}

/// Recency-ordered bounded map with O(1) operations.
///
/// # Type Parameters
///
/// - `K`: key type, `Eq + Hash + Clone` (the key is mirrored in the
///   recency list)
/// - `V`: value type; `Clone` only where values are copied out
///
/// # Example
///
/// ```
/// use cachemux::policy::lru::LruCache;
/// use cachemux::traits::CachePolicy;
///
/// let mut cache: LruCache<u32, String> = LruCache::try_new(100).unwrap();
/// cache.put(1, "page".to_string());
/// assert_eq!(cache.try_get(&1), Some("page".to_string()));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, Entry<V>>,
    order: OrderedKeyList<K>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: PolicyMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::try_new(100).unwrap();
    /// assert!(LruCache::<u32, String>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_capacity("LRU capacity must be > 0"));
        }
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: OrderedKeyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: PolicyMetrics::default(),
        })
    }

    /// Creates an LRU cache, panicking on zero capacity.
    ///
    /// Prefer [`try_new`](Self::try_new) when the capacity is not a
    /// compile-time constant.
    pub fn new(capacity: usize) -> Self {
        Self::try_new(capacity).expect("LRU capacity must be > 0")
    }

    /// Returns `true` if `key` is cached, without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Reads `key` without refreshing its recency.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::policy::lru::LruCache;
    /// use cachemux::traits::CachePolicy;
    ///
    /// let mut cache = LruCache::try_new(2).unwrap();
    /// cache.put(1, "a");
    /// cache.put(2, "b");
    ///
    /// // Peek leaves 1 as the LRU key, so it is still evicted next.
    /// assert_eq!(cache.peek(&1), Some(&"a"));
    /// cache.put(3, "c");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|entry| &entry.value)
    }

    /// Reads `key` mutably, refreshing its recency like a hit.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let entry = self.map.get_mut(key)?;
        self.order.move_to_front(entry.node);
        Some(&mut entry.value)
    }

    /// Refreshes `key`'s recency without reading it; returns `true` on hit.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.map.get(key) {
            Some(entry) => self.order.move_to_front(entry.node),
            None => false,
        }
    }

    /// Removes `key` and returns its value, if present.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        self.order.detach(entry.node);
        #[cfg(feature = "metrics")]
        self.metrics.record_removal();
        Some(entry.value)
    }

    /// Evicts and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let key = self.order.pop_back()?;
        let entry = self.map.remove(&key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        Some((key, entry.value))
    }

    /// Inspects the least recently used entry without evicting it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let key = self.order.peek_back()?;
        let entry = self.map.get(key)?;
        Some((key, &entry.value))
    }

    /// Current counter values. Only with the `metrics` feature.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn evict_lru(&mut self) {
        if let Some(victim) = self.order.pop_back() {
            self.map.remove(&victim);
            #[cfg(feature = "metrics")]
            self.metrics.record_eviction();
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.map.len(), self.order.len());
        assert!(self.map.len() <= self.capacity);
        for key in self.order.iter() {
            let entry = self.map.get(key).expect("listed key missing from index");
            assert!(self.order.get(entry.node) == Some(key));
        }
        self.order.debug_validate_invariants();
    }
}

impl<K, V> CachePolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        if let Some(entry) = self.map.get_mut(&key) {
            entry.value = value;
            self.order.move_to_front(entry.node);
            #[cfg(feature = "metrics")]
            self.metrics.record_update();
            return;
        }

        if self.map.len() >= self.capacity {
            self.evict_lru();
        }

        let node = self.order.push_front(key.clone());
        self.map.insert(key, Entry { value, node });
        #[cfg(feature = "metrics")]
        self.metrics.record_insert();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();
    }

    fn try_get(&mut self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(entry) => {
                let node = entry.node;
                let value = entry.value.clone();
                self.order.move_to_front(node);
                #[cfg(feature = "metrics")]
                self.metrics.record_hit();
                Some(value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_miss();
                None
            },
        }
    }

    fn remove(&mut self, key: &K) {
        if let Some(entry) = self.map.remove(key) {
            self.order.detach(entry.node);
            #[cfg(feature = "metrics")]
            self.metrics.record_removal();
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_fails_construction() {
        let err = LruCache::<u32, &str>::try_new(0).unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity(_)));
    }

    #[test]
    fn round_trip() {
        let mut cache = LruCache::try_new(4).unwrap();
        cache.put(1, "one");
        assert_eq!(cache.try_get(&1), Some("one"));
        assert_eq!(cache.get(&1), Ok("one"));
    }

    #[test]
    fn get_miss_does_not_mutate() {
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.try_get(&9), None);

        // Order unchanged: 1 is still the victim.
        assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(1));
    }

    #[test]
    fn hit_refreshes_recency() {
        // cap=2: put(1); put(2); get(1); put(3) -> {1, 3}, 2 misses.
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.try_get(&1), Some("a"));
        cache.put(3, "c");

        assert_eq!(cache.try_get(&2), None);
        assert_eq!(cache.try_get(&1), Some("a"));
        assert_eq!(cache.try_get(&3), Some("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn update_refreshes_recency_and_value() {
        // cap=3: put 1,2,3; put(1,a'); put(4) -> victim is 2.
        let mut cache = LruCache::try_new(3).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        cache.put(1, "a'");
        cache.put(4, "d");

        assert!(!cache.contains(&2));
        assert_eq!(cache.try_get(&1), Some("a'"));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn eviction_victim_is_least_recently_touched() {
        let mut cache = LruCache::try_new(3).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        cache.touch(&1);
        cache.try_get(&2);

        assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(3));
        cache.put(4, 4);
        assert!(!cache.contains(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put(1, "x");
        cache.remove(&1);
        cache.remove(&1);

        assert!(cache.is_empty());
        cache.debug_validate_invariants();
    }

    #[test]
    fn pop_lru_drains_in_recency_order() {
        let mut cache = LruCache::try_new(3).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        cache.try_get(&1);

        assert_eq!(cache.pop_lru(), Some((2, "b")));
        assert_eq!(cache.pop_lru(), Some((3, "c")));
        assert_eq!(cache.pop_lru(), Some((1, "a")));
        assert_eq!(cache.pop_lru(), None);
    }

    #[test]
    fn peek_does_not_refresh_recency() {
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.peek(&1), Some(&"a"));
        cache.put(3, "c");

        assert!(!cache.contains(&1));
    }

    #[test]
    fn get_mut_counts_as_a_hit() {
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put(1, 10);
        cache.put(2, 20);
        if let Some(value) = cache.get_mut(&1) {
            *value += 1;
        }
        cache.put(3, 30); // evicts 2, not the freshly touched 1

        assert_eq!(cache.try_get(&1), Some(11));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = LruCache::try_new(4).unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.try_get(&1), None);
        cache.put(3, "c");
        assert_eq!(cache.len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn index_and_list_stay_in_sync() {
        let mut cache = LruCache::try_new(8).unwrap();
        for i in 0..32 {
            cache.put(i % 12, i);
            if i % 3 == 0 {
                cache.try_get(&(i % 5));
            }
            if i % 7 == 0 {
                cache.remove(&(i % 4));
            }
            cache.debug_validate_invariants();
        }
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_operations() {
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put(1, "a");
        cache.put(1, "b");
        cache.put(2, "c");
        cache.put(3, "d"); // evicts 1
        cache.try_get(&2);
        cache.try_get(&9);
        cache.remove(&3);

        let snap = cache.metrics_snapshot();
        assert_eq!(snap.inserts, 3);
        assert_eq!(snap.updates, 1);
        assert_eq!(snap.evictions, 1);
        assert_eq!(snap.hits, 1);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.removals, 1);
    }
}
