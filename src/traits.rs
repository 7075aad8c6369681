//! # The cache policy contract
//!
//! One trait, [`CachePolicy`], is implemented by every eviction policy in
//! this crate, making the policies interchangeable behind a single
//! interface:
//!
//! ```text
//!                 ┌────────────────────────────────────────┐
//!                 │          CachePolicy<K, V>             │
//!                 │                                        │
//!                 │  put(&mut, K, V)                       │
//!                 │  try_get(&mut, &K) -> Option<V>        │
//!                 │  get(&mut, &K) -> Result<V, CacheError>│
//!                 │  remove(&mut, &K)                      │
//!                 │  len / is_empty / capacity / clear     │
//!                 └───────────────────┬────────────────────┘
//!                                     │
//!      ┌──────────┬──────────────┬────┴────────┬─────────────┐
//!      ▼          ▼              ▼             ▼             ▼
//!  LruCache   LruKCache   ShardedLruCache   LfuCache     ArcCache
//! ```
//!
//! ## Contract semantics
//!
//! | Operation | On hit | On miss |
//! |-----------|--------|---------|
//! | `put`     | update value, refresh policy state | insert, possibly evicting one entry |
//! | `try_get` | refresh policy state, return copy | return `None`, no mutation of live entries |
//! | `get`     | as `try_get` | `Err(CacheError::NotFound)` |
//! | `remove`  | erase entry | silently do nothing |
//!
//! Every policy in this crate resolves the miss behavior of `get` the same
//! way: it fails with [`CacheError::NotFound`]. No policy synthesizes a
//! defaulted value.
//!
//! Reads return an owned copy of the value (`V: Clone` on the read methods):
//! callers are never handed references into live nodes, so a concurrent
//! wrapper can release its lock as soon as the operation returns.
//!
//! ARC is the one policy where `try_get` may mutate on a miss: a ghost hit
//! adjusts the adaptive target and may evict, yet still reports a miss
//! because ghost records carry no value. That is part of the ARC contract,
//! not a violation of this one — "no mutation" above refers to live entries.
//!
//! ## Example: policy-generic code
//!
//! ```
//! use cachemux::policy::lru::LruCache;
//! use cachemux::policy::lfu::LfuCache;
//! use cachemux::traits::CachePolicy;
//!
//! fn warm<C: CachePolicy<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
//!     for (key, value) in data {
//!         cache.put(*key, value.clone());
//!     }
//! }
//!
//! let data = vec![(1, "one".to_string()), (2, "two".to_string())];
//!
//! let mut lru = LruCache::try_new(8).unwrap();
//! let mut lfu = LfuCache::try_new(8).unwrap();
//! warm(&mut lru, &data);
//! warm(&mut lfu, &data);
//!
//! assert_eq!(lru.try_get(&1), Some("one".to_string()));
//! assert_eq!(lfu.try_get(&2), Some("two".to_string()));
//! ```

use crate::error::CacheError;

/// Common contract implemented by every eviction policy.
///
/// All operations are O(1) amortized. Each policy fixes its capacity at
/// construction; `put` on a full cache evicts exactly one entry chosen by
/// the policy before inserting.
///
/// # Type Parameters
///
/// - `K`: key type; policies require `Eq + Hash + Clone`
/// - `V`: value type; reads require `Clone` so values are copied out
///
/// # Example
///
/// ```
/// use cachemux::policy::lru::LruCache;
/// use cachemux::traits::CachePolicy;
///
/// let mut cache: LruCache<u64, &str> = LruCache::try_new(2).unwrap();
/// cache.put(1, "a");
/// cache.put(2, "b");
/// cache.put(3, "c"); // evicts key 1
///
/// assert_eq!(cache.try_get(&1), None);
/// assert_eq!(cache.try_get(&3), Some("c"));
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CachePolicy<K, V> {
    /// Inserts or updates `key`. Never fails.
    ///
    /// If the key is present its value is overwritten and its policy state
    /// (recency, frequency, list membership) refreshed. Otherwise the entry
    /// is inserted, evicting one victim first if the cache is full.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::policy::lru::LruCache;
    /// use cachemux::traits::CachePolicy;
    ///
    /// let mut cache = LruCache::try_new(4).unwrap();
    /// cache.put(1, "first");
    /// cache.put(1, "second"); // overwrite, no growth
    /// assert_eq!(cache.len(), 1);
    /// assert_eq!(cache.try_get(&1), Some("second"));
    /// ```
    fn put(&mut self, key: K, value: V);

    /// Reads `key`, returning a copy of the value on hit and `None` on miss.
    ///
    /// A hit refreshes the entry's policy state. A miss does not mutate live
    /// entries (ARC may still adjust its adaptation state on a ghost hit).
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::policy::lru::LruCache;
    /// use cachemux::traits::CachePolicy;
    ///
    /// let mut cache = LruCache::try_new(4).unwrap();
    /// cache.put(1, 10);
    /// assert_eq!(cache.try_get(&1), Some(10));
    /// assert_eq!(cache.try_get(&2), None);
    /// ```
    fn try_get(&mut self, key: &K) -> Option<V>;

    /// Reads `key`, failing with [`CacheError::NotFound`] on miss.
    ///
    /// Equivalent to [`try_get`](Self::try_get) with the miss made an error.
    /// All policies in this crate use this behavior; none returns a
    /// defaulted value.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::error::CacheError;
    /// use cachemux::policy::lru::LruCache;
    /// use cachemux::traits::CachePolicy;
    ///
    /// let mut cache = LruCache::try_new(4).unwrap();
    /// cache.put(1, "hit");
    /// assert_eq!(cache.get(&1), Ok("hit"));
    /// assert_eq!(cache.get(&2), Err(CacheError::NotFound));
    /// ```
    fn get(&mut self, key: &K) -> Result<V, CacheError> {
        self.try_get(key).ok_or(CacheError::NotFound)
    }

    /// Removes `key` if present; silent when absent.
    ///
    /// `remove` is idempotent: removing the same key twice is equivalent to
    /// removing it once.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::policy::lru::LruCache;
    /// use cachemux::traits::CachePolicy;
    ///
    /// let mut cache = LruCache::try_new(4).unwrap();
    /// cache.put(1, "x");
    /// cache.remove(&1);
    /// cache.remove(&1); // no-op
    /// assert!(cache.is_empty());
    /// ```
    fn remove(&mut self, key: &K);

    /// Returns the number of live (value-bearing) entries.
    ///
    /// Ghost records (ARC) and pending history entries (LRU-K) do not count.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of live entries.
    fn capacity(&self) -> usize;

    /// Drops every live entry and resets policy state (adaptation targets,
    /// frequencies, histories) to its post-construction value.
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal contract implementation exercising the default methods.
    struct TinyCache {
        slot: Option<(u8, u8)>,
    }

    impl CachePolicy<u8, u8> for TinyCache {
        fn put(&mut self, key: u8, value: u8) {
            self.slot = Some((key, value));
        }

        fn try_get(&mut self, key: &u8) -> Option<u8> {
            match self.slot {
                Some((k, v)) if k == *key => Some(v),
                _ => None,
            }
        }

        fn remove(&mut self, key: &u8) {
            if matches!(self.slot, Some((k, _)) if k == *key) {
                self.slot = None;
            }
        }

        fn len(&self) -> usize {
            usize::from(self.slot.is_some())
        }

        fn capacity(&self) -> usize {
            1
        }

        fn clear(&mut self) {
            self.slot = None;
        }
    }

    #[test]
    fn default_get_maps_miss_to_not_found() {
        let mut cache = TinyCache { slot: None };
        assert_eq!(cache.get(&1), Err(CacheError::NotFound));

        cache.put(1, 10);
        assert_eq!(cache.get(&1), Ok(10));
    }

    #[test]
    fn default_is_empty_tracks_len() {
        let mut cache = TinyCache { slot: None };
        assert!(cache.is_empty());
        cache.put(2, 20);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
