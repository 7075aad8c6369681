//! # Least Frequently Used (LFU) cache with aging
//!
//! Frequency-bucketed cache: every live entry carries an access count, and
//! entries sharing a count live in one recency-ordered bucket. Eviction
//! takes the stalest entry of the lowest-count bucket in O(1).
//!
//! ## Architecture
//!
//! ```text
//!   map: FxHashMap<K, Entry { value, freq, node }>
//!
//!   buckets: FxHashMap<u64, OrderedKeyList<K>>      min_freq ──┐
//!                                                              ▼
//!   freq 1:  head ─► [d] ◄──► [c] ◄── tail   ◄── evict from here
//!   freq 3:  head ─► [a] ◄── tail
//!   freq 7:  head ─► [b] ◄── tail
//!            (front = most recently promoted into the bucket)
//! ```
//!
//! On access an entry moves from bucket `f` to bucket `f + 1` (created
//! lazily); an emptied bucket is dropped, advancing `min_freq` when it was
//! the minimum. `total_freq` tracks the sum of all counts so the average
//! frequency is available in O(1).
//!
//! ## Aging
//!
//! Pure LFU never forgets: an entry hot last week outranks everything hot
//! now. When the average frequency exceeds the configured threshold, a full
//! aging pass halves every count (`freq <- max(1, freq / 2)`, integer
//! division), rebuckets, resets `min_freq` to 1, and recomputes
//! `total_freq`. The default threshold is high enough that aging never
//! fires unless explicitly configured.
//!
//! ## Example
//!
//! ```
//! use cachemux::policy::lfu::LfuCache;
//! use cachemux::traits::CachePolicy;
//!
//! let mut cache = LfuCache::try_new(2).unwrap();
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.try_get(&1);
//! cache.try_get(&1);
//! cache.put(3, "c"); // evicts 2: lowest frequency
//!
//! assert_eq!(cache.try_get(&2), None);
//! assert_eq!(cache.try_get(&1), Some("a"));
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::key_list::{NodeHandle, OrderedKeyList};
use crate::error::CacheError;
#[cfg(feature = "metrics")]
use crate::metrics::{MetricsSnapshot, PolicyMetrics};
use crate::traits::CachePolicy;

/// Aging threshold used by [`LfuCache::try_new`]; high enough that aging
/// effectively never triggers.
pub const DEFAULT_MAX_AVG_FREQ: u64 = 1_000_000;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    freq: u64,
    node: NodeHandle,
}

/// Frequency-bucketed bounded map with periodic aging.
///
/// # Example
///
/// ```
/// use cachemux::policy::lfu::LfuCache;
/// use cachemux::traits::CachePolicy;
///
/// // Aggressive aging: halve all counts once the average exceeds 4.
/// let mut cache = LfuCache::try_with_max_avg(10, 4).unwrap();
/// cache.put(1, "hot");
/// for _ in 0..8 {
///     cache.try_get(&1);
/// }
/// assert!(cache.frequency(&1).unwrap() < 9);
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, Entry<V>>,
    buckets: FxHashMap<u64, OrderedKeyList<K>>,
    min_freq: u64,
    total_freq: u64,
    max_avg_freq: u64,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: PolicyMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache with aging effectively disabled
    /// ([`DEFAULT_MAX_AVG_FREQ`]).
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if `capacity` is 0.
    pub fn try_new(capacity: usize) -> Result<Self, CacheError> {
        Self::try_with_max_avg(capacity, DEFAULT_MAX_AVG_FREQ)
    }

    /// Creates an LFU cache that runs an aging pass whenever the average
    /// frequency exceeds `max_avg_freq`.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if `capacity` or `max_avg_freq` is 0.
    pub fn try_with_max_avg(capacity: usize, max_avg_freq: u64) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_capacity("LFU capacity must be > 0"));
        }
        if max_avg_freq == 0 {
            return Err(CacheError::invalid_capacity(
                "LFU aging threshold must be >= 1",
            ));
        }
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 1,
            total_freq: 0,
            max_avg_freq,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: PolicyMetrics::default(),
        })
    }

    /// Returns `true` if `key` is cached, without touching its frequency.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns `key`'s current access count.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|entry| entry.freq)
    }

    /// Lowest access count among live entries. Meaningful only while the
    /// cache is non-empty; may point below the actual minimum right after
    /// an aging pass (eviction re-scans in that case).
    pub fn min_freq(&self) -> u64 {
        self.min_freq
    }

    /// Sum of all access counts.
    pub fn total_freq(&self) -> u64 {
        self.total_freq
    }

    /// Configured aging threshold.
    pub fn max_avg_freq(&self) -> u64 {
        self.max_avg_freq
    }

    /// Current counter values. Only with the `metrics` feature.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Moves `key` from bucket `f` to bucket `f + 1`.
    fn bump_freq(&mut self, key: &K) {
        let Some(entry) = self.map.get(key) else {
            return;
        };
        let old_freq = entry.freq;
        let node = entry.node;

        if old_freq == u64::MAX {
            // Counter saturated: refresh recency within the bucket only.
            if let Some(bucket) = self.buckets.get_mut(&old_freq) {
                bucket.move_to_front(node);
            }
            return;
        }

        let mut emptied = false;
        if let Some(bucket) = self.buckets.get_mut(&old_freq) {
            bucket.detach(node);
            emptied = bucket.is_empty();
        }
        if emptied {
            self.buckets.remove(&old_freq);
            if self.min_freq == old_freq {
                self.min_freq = old_freq + 1;
            }
        }

        let new_freq = old_freq + 1;
        let new_node = self
            .buckets
            .entry(new_freq)
            .or_default()
            .push_front(key.clone());
        if let Some(entry) = self.map.get_mut(key) {
            entry.freq = new_freq;
            entry.node = new_node;
        }
        self.total_freq += 1;
    }

    /// Evicts the stalest entry of the lowest-frequency bucket.
    fn evict(&mut self) {
        if !self.buckets.contains_key(&self.min_freq) {
            // Stale min_freq (possible after aging): correct by scanning.
            self.refresh_min_freq();
        }
        let freq = self.min_freq;
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            debug_assert!(self.map.is_empty(), "eviction with live entries but no buckets");
            return;
        };
        let Some(victim) = bucket.pop_back() else {
            debug_assert!(false, "min_freq bucket is empty");
            return;
        };
        let emptied = bucket.is_empty();
        if let Some(entry) = self.map.remove(&victim) {
            self.total_freq -= entry.freq;
        }
        if emptied {
            self.buckets.remove(&freq);
            self.refresh_min_freq();
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
    }

    fn refresh_min_freq(&mut self) {
        self.min_freq = self.buckets.keys().copied().min().unwrap_or(1);
    }

    /// Runs the aging check after an operation that changed the totals.
    fn maybe_age(&mut self) {
        let len = self.map.len() as u64;
        if len > 0 && self.total_freq / len > self.max_avg_freq {
            self.age();
        }
    }

    /// Full aging pass: halve every count, rebucket, reset `min_freq`.
    ///
    /// Per-bucket relative recency is preserved (entries are drained from
    /// the eviction end and re-pushed at the front).
    fn age(&mut self) {
        let mut freqs: Vec<u64> = self.buckets.keys().copied().collect();
        freqs.sort_unstable();

        let mut rebucketed: FxHashMap<u64, OrderedKeyList<K>> = FxHashMap::default();
        let mut total = 0u64;
        for freq in freqs {
            let Some(mut bucket) = self.buckets.remove(&freq) else {
                continue;
            };
            let new_freq = (freq / 2).max(1);
            while let Some(key) = bucket.pop_back() {
                let node = rebucketed
                    .entry(new_freq)
                    .or_default()
                    .push_front(key.clone());
                if let Some(entry) = self.map.get_mut(&key) {
                    entry.freq = new_freq;
                    entry.node = node;
                }
                total += new_freq;
            }
        }

        self.buckets = rebucketed;
        self.total_freq = total;
        self.min_freq = 1;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let bucketed: usize = self.buckets.values().map(|bucket| bucket.len()).sum();
        assert_eq!(bucketed, self.map.len());
        assert!(self.map.len() <= self.capacity);

        let mut total = 0u64;
        for (freq, bucket) in &self.buckets {
            assert!(!bucket.is_empty(), "empty bucket left behind");
            for key in bucket.iter() {
                let entry = self.map.get(key).expect("bucketed key missing from index");
                assert_eq!(entry.freq, *freq);
                assert!(bucket.get(entry.node) == Some(key));
            }
            total += freq * bucket.len() as u64;
            bucket.debug_validate_invariants();
        }
        assert_eq!(total, self.total_freq);

        if !self.map.is_empty() {
            let actual_min = self.buckets.keys().copied().min().unwrap();
            assert!(self.min_freq <= actual_min);
        }
    }
}

impl<K, V> CachePolicy<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) {
        if self.map.contains_key(&key) {
            if let Some(entry) = self.map.get_mut(&key) {
                entry.value = value;
            }
            self.bump_freq(&key);
            #[cfg(feature = "metrics")]
            self.metrics.record_update();
            self.maybe_age();
            return;
        }

        if self.map.len() >= self.capacity {
            self.evict();
        }

        let node = self.buckets.entry(1).or_default().push_front(key.clone());
        self.map.insert(
            key,
            Entry {
                value,
                freq: 1,
                node,
            },
        );
        self.min_freq = 1;
        self.total_freq += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_insert();
        self.maybe_age();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();
    }

    fn try_get(&mut self, key: &K) -> Option<V> {
        if !self.map.contains_key(key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_miss();
            return None;
        }

        self.bump_freq(key);
        let value = self.map.get(key).map(|entry| entry.value.clone());
        #[cfg(feature = "metrics")]
        self.metrics.record_hit();
        self.maybe_age();
        value
    }

    fn remove(&mut self, key: &K) {
        let Some(entry) = self.map.remove(key) else {
            return;
        };
        let mut emptied = false;
        if let Some(bucket) = self.buckets.get_mut(&entry.freq) {
            bucket.detach(entry.node);
            emptied = bucket.is_empty();
        }
        if emptied {
            self.buckets.remove(&entry.freq);
            if self.min_freq == entry.freq {
                self.refresh_min_freq();
            }
        }
        self.total_freq -= entry.freq;
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
        self.buckets.clear();
        self.min_freq = 1;
        self.total_freq = 0;
    }
}
