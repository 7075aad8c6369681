//! Deterministic key-to-shard mapping for the sharded LRU.
//!
//! Maps any `Hash`able key to a shard index in `[0, shards)` via a seeded
//! `DefaultHasher`. The same `(key, seed, shards)` tuple always yields the
//! same shard, so a key is served by exactly one sub-cache for the lifetime
//! of the instance. The seed exists to decorrelate the shard hash from
//! whatever hash the caller's own tables use.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeded, deterministic shard selector.
///
/// # Example
///
/// ```
/// use cachemux::ds::ShardSelector;
///
/// let selector = ShardSelector::new(4, 0);
/// let shard = selector.shard_for_key(&"user:42");
/// assert!(shard < 4);
///
/// // Same key, same shard.
/// assert_eq!(selector.shard_for_key(&"user:42"), shard);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards (clamped to at least 1).
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps `key` to a shard index in `[0, shards)`.
    pub fn shard_for_key<K: Hash>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }
}

impl Default for ShardSelector {
    /// Single-shard selector with seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same key always maps to the same in-range shard.
        #[test]
        fn prop_deterministic_mapping(
            shard_count in 1usize..64,
            seed in any::<u64>(),
            key in any::<u32>()
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            let first = selector.shard_for_key(&key);
            prop_assert!(first < shard_count);
            prop_assert_eq!(selector.shard_for_key(&key), first);
        }

        /// Every shard index stays in range across a batch of keys.
        #[test]
        fn prop_in_range_batch(
            shard_count in 1usize..64,
            seed in any::<u64>(),
            keys in prop::collection::vec(any::<u32>(), 0..64)
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            for key in keys {
                prop_assert!(selector.shard_for_key(&key) < shard_count);
            }
        }
    }
}
