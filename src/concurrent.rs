//! Mutex-wrapped policies for shared use.
//!
//! Policy cores are single-threaded (`&mut self`). [`ConcurrentCache`]
//! wraps any of them in one `parking_lot::Mutex` held for the full duration
//! of each operation, which makes every externally observable operation
//! atomic: for any two concurrent calls, the outcome is as if one ran
//! entirely before the other, and the total order of operations on an
//! instance is the order in which they acquired the lock.
//!
//! Values are copied out of the cache before the lock is released — callers
//! never hold references into live nodes — so the wrapper's methods take
//! `&self` and return owned values.
//!
//! There is no cross-instance ordering of any kind. For a cache that takes
//! per-shard locks instead of one global one, see
//! [`ShardedLruCache`](crate::policy::sharded::ShardedLruCache), which is
//! natively concurrent.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use cachemux::concurrent::ConcurrentLruCache;
//! use cachemux::policy::lru::LruCache;
//!
//! let cache = Arc::new(ConcurrentLruCache::new(LruCache::try_new(64).unwrap()));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..16u64 {
//!                 cache.put(t * 100 + i, i);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(cache.try_get(&5), Some(5));
//! ```

use std::marker::PhantomData;

use parking_lot::Mutex;

use crate::error::CacheError;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::policy::lru_k::LruKCache;
use crate::traits::CachePolicy;

/// Thread-safe wrapper holding a policy core behind one mutex.
///
/// Every method acquires the lock for the whole operation; no operation
/// awaits anything else, so the lock is the only blocking point.
pub struct ConcurrentCache<K, V, P>
where
    P: CachePolicy<K, V>,
{
    inner: Mutex<P>,
    _marker: PhantomData<fn() -> (K, V)>,
}

/// [`LruCache`] behind a mutex.
pub type ConcurrentLruCache<K, V> = ConcurrentCache<K, V, LruCache<K, V>>;
/// [`LruKCache`] behind a mutex.
pub type ConcurrentLruKCache<K, V> = ConcurrentCache<K, V, LruKCache<K, V>>;
/// [`LfuCache`] behind a mutex.
pub type ConcurrentLfuCache<K, V> = ConcurrentCache<K, V, LfuCache<K, V>>;
/// [`ArcCache`] behind a mutex.
pub type ConcurrentArcCache<K, V> = ConcurrentCache<K, V, ArcCache<K, V>>;

impl<K, V, P> ConcurrentCache<K, V, P>
where
    P: CachePolicy<K, V>,
{
    /// Wraps a policy core.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::concurrent::ConcurrentCache;
    /// use cachemux::policy::lfu::LfuCache;
    ///
    /// let cache = ConcurrentCache::new(LfuCache::<u64, String>::try_new(32).unwrap());
    /// cache.put(1, "one".to_string());
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn new(policy: P) -> Self {
        Self {
            inner: Mutex::new(policy),
            _marker: PhantomData,
        }
    }

    /// Consumes the wrapper, returning the inner policy.
    pub fn into_inner(self) -> P {
        self.inner.into_inner()
    }

    /// Inserts or updates `key`.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Reads `key`; `None` on miss. The value is copied out under the lock.
    pub fn try_get(&self, key: &K) -> Option<V> {
        self.inner.lock().try_get(key)
    }

    /// Reads `key`, failing with [`CacheError::NotFound`] on miss.
    pub fn get(&self, key: &K) -> Result<V, CacheError> {
        self.inner.lock().get(key)
    }

    /// Removes `key`; silent on absent.
    pub fn remove(&self, key: &K) {
        self.inner.lock().remove(key);
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops every live entry and resets policy state.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}
