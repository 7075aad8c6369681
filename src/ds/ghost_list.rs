//! Bounded recency list for ghost entries.
//!
//! Tracks keys recently evicted from a real cache list without storing
//! values: an [`OrderedKeyList`] for recency order plus an `FxHashMap` index
//! for O(1) membership and removal. ARC uses two of these as its B1/B2
//! ghost tails; a hit in one ("ghost hit") steers the adaptive target `p`.
//!
//! ```text
//!   index: { "a" -> h0, "b" -> h1, "c" -> h2 }
//!   list:  head ─► [a] ◄──► [b] ◄──► [c] ◄── tail
//!                  MRU                LRU (dropped first)
//! ```
//!
//! `record` promotes an already-tracked key to MRU, otherwise inserts at MRU
//! and drops the LRU key once the configured bound is exceeded. A capacity
//! of 0 makes the list a no-op. All operations are O(1) average.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::key_list::{NodeHandle, OrderedKeyList};

/// Bounded key-only recency list, as used for ARC ghost tracking.
///
/// # Example
///
/// ```
/// use cachemux::ds::GhostList;
///
/// let mut ghost = GhostList::new(2);
/// ghost.record("a");
/// ghost.record("b");
/// ghost.record("c"); // bound reached: "a" is dropped
///
/// assert!(!ghost.contains(&"a"));
/// assert!(ghost.contains(&"b"));
/// assert!(ghost.remove(&"c"));
/// assert_eq!(ghost.len(), 1);
/// ```
#[derive(Debug)]
pub struct GhostList<K> {
    list: OrderedKeyList<K>,
    index: FxHashMap<K, NodeHandle>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list holding at most `capacity` keys.
    ///
    /// A capacity of 0 creates a list that ignores all records.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: OrderedKeyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Returns the configured bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is tracked (the ghost-hit check).
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` at the MRU end, dropping the LRU key if the bound is
    /// exceeded. An already-tracked key is promoted to MRU instead.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&handle) = self.index.get(&key) {
            self.list.move_to_front(handle);
            return;
        }

        if self.list.len() >= self.capacity {
            self.pop_lru();
        }

        let handle = self.list.push_front(key.clone());
        self.index.insert(key, handle);
    }

    /// Removes `key`; returns `true` if it was tracked.
    ///
    /// Called on a ghost hit so the key is not counted twice.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(handle) => {
                self.list.detach(handle);
                true
            },
            None => false,
        }
    }

    /// Drops and returns the LRU key.
    pub fn pop_lru(&mut self) -> Option<K> {
        let key = self.list.pop_back()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Forgets all tracked keys.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.list.len() <= self.capacity);
        for key in self.list.iter() {
            let handle = self.index.get(key).expect("listed key missing from index");
            assert!(self.list.get(*handle) == Some(key));
        }
        self.list.debug_validate_invariants();
    }
}
