//! # Hash-sharded LRU cache
//!
//! Fan-out of independent [`LruCache`] shards, each guarded by its own
//! `parking_lot::Mutex`. Every operation hashes the key to a shard and
//! delegates unchanged, trading contention on one global lock for
//! independent per-shard contention.
//!
//! ```text
//!                          key
//!                           │
//!                           ▼
//!              ShardSelector::shard_for_key
//!                           │
//!        ┌──────────┬───────┴──┬──────────┐
//!        ▼          ▼          ▼          ▼
//!   Mutex<LRU>  Mutex<LRU> Mutex<LRU> Mutex<LRU>   each ceil(C / N)
//! ```
//!
//! Shards share no state. Atomicity holds per shard only: callers observing
//! related keys in different shards must not assume a global operation
//! order, and the total capacity bound is approximate (`N * ceil(C / N)`).
//!
//! ## Example
//!
//! ```
//! use cachemux::policy::sharded::ShardedLruCache;
//!
//! let cache = ShardedLruCache::try_new(100, 4).unwrap();
//! cache.put(1, "one");
//! assert_eq!(cache.try_get(&1), Some("one"));
//! ```

use std::hash::Hash;
use std::thread;

use parking_lot::Mutex;

use crate::ds::shard::ShardSelector;
use crate::error::CacheError;
use crate::policy::lru::LruCache;
use crate::traits::CachePolicy;

/// LRU cache partitioned into independently locked shards.
///
/// Methods take `&self`: synchronization is internal and per-shard. The
/// shard count defaults to the hardware parallelism estimate when 0 is
/// passed.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use cachemux::policy::sharded::ShardedLruCache;
///
/// let cache = Arc::new(ShardedLruCache::try_new(64, 4).unwrap());
/// let writer = {
///     let cache = Arc::clone(&cache);
///     thread::spawn(move || {
///         for i in 0..16u64 {
///             cache.put(i, i * 10);
///         }
///     })
/// };
/// writer.join().unwrap();
/// assert_eq!(cache.try_get(&3), Some(30));
/// ```
#[derive(Debug)]
pub struct ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    shards: Vec<Mutex<LruCache<K, V>>>,
    selector: ShardSelector,
    capacity: usize,
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a sharded LRU with `capacity` total entries split across
    /// `shards` sub-caches (each `ceil(capacity / shards)`).
    ///
    /// `shards == 0` selects the hardware parallelism estimate.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if `capacity` is 0.
    pub fn try_new(capacity: usize, shards: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_capacity(
                "sharded LRU capacity must be > 0",
            ));
        }
        let shard_count = if shards == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            shards
        };
        let shard_capacity = capacity.div_ceil(shard_count);

        let mut slices = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            slices.push(Mutex::new(LruCache::try_new(shard_capacity)?));
        }

        Ok(Self {
            shards: slices,
            selector: ShardSelector::new(shard_count, 0),
            capacity,
        })
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the total configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts or updates `key` in its shard.
    pub fn put(&self, key: K, value: V) {
        self.shard_for(&key).lock().put(key, value);
    }

    /// Reads `key` from its shard; `None` on miss.
    pub fn try_get(&self, key: &K) -> Option<V> {
        self.shard_for(key).lock().try_get(key)
    }

    /// Reads `key`, failing with [`CacheError::NotFound`] on miss.
    pub fn get(&self, key: &K) -> Result<V, CacheError> {
        self.try_get(key).ok_or(CacheError::NotFound)
    }

    /// Removes `key` from its shard; silent on absent.
    pub fn remove(&self, key: &K) {
        self.shard_for(key).lock().remove(key);
    }

    /// Returns `true` if `key` is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.shard_for(key).lock().contains(key)
    }

    /// Sums entry counts across shards.
    ///
    /// The sum is not a snapshot of one instant: concurrent writers may
    /// move the count while shards are visited in turn.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Clears every shard (shard by shard, not atomically).
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }

    fn shard_for(&self, key: &K) -> &Mutex<LruCache<K, V>> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.selector.shard_count(), self.shards.len());
        for shard in &self.shards {
            shard.lock().debug_validate_invariants();
        }
    }
}

impl<K, V> CachePolicy<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        Self::put(self, key, value);
    }

    fn try_get(&mut self, key: &K) -> Option<V> {
        Self::try_get(self, key)
    }

    fn remove(&mut self, key: &K) {
        Self::remove(self, key);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }
}
