//! Unified cache builder over all eviction policies.
//!
//! Provides one entry point for constructing any policy and a [`Cache`]
//! dispatch enum so callers can pick a policy at runtime without generics.
//! The policies do not form a hierarchy — LRU-K and the sharded cache
//! compose an inner LRU, the rest stand alone — so a flat enum plus one
//! indirection is all the polymorphism required.
//!
//! ## Example
//!
//! ```
//! use cachemux::builder::{CacheBuilder, PolicyKind};
//!
//! let mut cache = CacheBuilder::new(100)
//!     .try_build::<u64, String>(PolicyKind::Lru)
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.try_get(&1), Some("hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::CacheError;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::policy::lru_k::LruKCache;
use crate::policy::sharded::ShardedLruCache;
use crate::traits::CachePolicy;

/// Available eviction policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// Least Recently Used eviction.
    Lru,
    /// LRU gated by a K-hit admission filter.
    LruK {
        /// Bound on the admission history table.
        history_capacity: usize,
        /// Hits required before a key enters the main cache.
        k: u64,
    },
    /// Hash-sharded LRU; `shards == 0` selects the parallelism estimate.
    Sharded { shards: usize },
    /// Frequency-bucketed LFU with an aging threshold on the average
    /// frequency.
    Lfu { max_avg_freq: u64 },
    /// Adaptive Replacement Cache.
    Arc,
}

/// Runtime-dispatched cache over the five policies.
///
/// Implements the same surface as [`CachePolicy`], delegating to the chosen
/// policy.
#[derive(Debug)]
pub enum Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    Lru(LruCache<K, V>),
    LruK(LruKCache<K, V>),
    Sharded(ShardedLruCache<K, V>),
    Lfu(LfuCache<K, V>),
    Arc(ArcCache<K, V>),
}

macro_rules! dispatch {
    ($self:expr, $cache:ident => $body:expr) => {
        match $self {
            Cache::Lru($cache) => $body,
            Cache::LruK($cache) => $body,
            Cache::Sharded($cache) => $body,
            Cache::Lfu($cache) => $body,
            Cache::Arc($cache) => $body,
        }
    };
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Inserts or updates `key`.
    pub fn put(&mut self, key: K, value: V) {
        dispatch!(self, cache => cache.put(key, value))
    }

    /// Reads `key`; `None` on miss.
    pub fn try_get(&mut self, key: &K) -> Option<V> {
        dispatch!(self, cache => cache.try_get(key))
    }

    /// Reads `key`, failing with [`CacheError::NotFound`] on miss.
    pub fn get(&mut self, key: &K) -> Result<V, CacheError> {
        dispatch!(self, cache => cache.get(key))
    }

    /// Removes `key`; silent on absent.
    pub fn remove(&mut self, key: &K) {
        dispatch!(self, cache => cache.remove(key))
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        dispatch!(self, cache => CachePolicy::len(cache))
    }

    /// Returns `true` if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        dispatch!(self, cache => CachePolicy::capacity(cache))
    }

    /// Drops every entry and resets policy state.
    pub fn clear(&mut self) {
        dispatch!(self, cache => cache.clear())
    }
}

/// Builder fixing the capacity, then producing a [`Cache`] for a policy.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for caches of `capacity` live entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the chosen policy.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] when the capacity (or a policy
    /// parameter) is out of range. ARC accepts capacity 0; every other
    /// policy rejects it.
    ///
    /// # Example
    ///
    /// ```
    /// use cachemux::builder::{CacheBuilder, PolicyKind};
    ///
    /// let lru_k = CacheBuilder::new(100)
    ///     .try_build::<u64, String>(PolicyKind::LruK { history_capacity: 200, k: 2 });
    /// assert!(lru_k.is_ok());
    ///
    /// let bad = CacheBuilder::new(0).try_build::<u64, String>(PolicyKind::Lru);
    /// assert!(bad.is_err());
    /// ```
    pub fn try_build<K, V>(self, policy: PolicyKind) -> Result<Cache<K, V>, CacheError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        Ok(match policy {
            PolicyKind::Lru => Cache::Lru(LruCache::try_new(self.capacity)?),
            PolicyKind::LruK {
                history_capacity,
                k,
            } => Cache::LruK(LruKCache::try_new(self.capacity, history_capacity, k)?),
            PolicyKind::Sharded { shards } => {
                Cache::Sharded(ShardedLruCache::try_new(self.capacity, shards)?)
            },
            PolicyKind::Lfu { max_avg_freq } => {
                Cache::Lfu(LfuCache::try_with_max_avg(self.capacity, max_avg_freq)?)
            },
            PolicyKind::Arc => Cache::Arc(ArcCache::new(self.capacity)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::lfu::DEFAULT_MAX_AVG_FREQ;

    fn all_kinds() -> Vec<PolicyKind> {
        vec![
            PolicyKind::Lru,
            PolicyKind::LruK {
                history_capacity: 16,
                k: 1,
            },
            PolicyKind::Sharded { shards: 2 },
            PolicyKind::Lfu {
                max_avg_freq: DEFAULT_MAX_AVG_FREQ,
            },
            PolicyKind::Arc,
        ]
    }

    #[test]
    fn all_policies_honor_the_contract() {
        for kind in all_kinds() {
            let mut cache = CacheBuilder::new(10)
                .try_build::<u64, String>(kind.clone())
                .unwrap();

            cache.put(1, "one".to_string());
            cache.put(2, "two".to_string());
            assert_eq!(cache.try_get(&1), Some("one".to_string()), "{kind:?}");
            assert_eq!(cache.try_get(&3), None, "{kind:?}");

            cache.put(1, "ONE".to_string());
            assert_eq!(cache.try_get(&1), Some("ONE".to_string()), "{kind:?}");

            cache.remove(&2);
            cache.remove(&2);
            assert_eq!(cache.try_get(&2), None, "{kind:?}");

            cache.clear();
            assert!(cache.is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn capacity_is_enforced() {
        let mut cache = CacheBuilder::new(2)
            .try_build::<u64, &str>(PolicyKind::Lru)
            .unwrap();
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.len(), 2);
        assert!(cache.try_get(&1).is_none());
    }

    #[test]
    fn zero_capacity_is_policy_dependent() {
        assert!(
            CacheBuilder::new(0)
                .try_build::<u64, &str>(PolicyKind::Lru)
                .is_err()
        );
        assert!(
            CacheBuilder::new(0)
                .try_build::<u64, &str>(PolicyKind::Sharded { shards: 0 })
                .is_err()
        );

        // ARC is defined for capacity 0: a ghost-only instance.
        let mut arc = CacheBuilder::new(0)
            .try_build::<u64, &str>(PolicyKind::Arc)
            .unwrap();
        arc.put(1, "a");
        assert_eq!(arc.try_get(&1), None);
    }

    #[test]
    fn builder_surfaces_parameter_errors() {
        let err = CacheBuilder::new(8)
            .try_build::<u64, &str>(PolicyKind::LruK {
                history_capacity: 8,
                k: 0,
            })
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity(_)));
    }
}
