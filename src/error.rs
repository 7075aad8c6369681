//! Error types for the cachemux library.
//!
//! Two externally visible failure modes exist:
//!
//! - [`CacheError::InvalidCapacity`]: construction-time only; a capacity (or
//!   related parameter such as the LRU-K threshold) was zero where the policy
//!   forbids it.
//! - [`CacheError::NotFound`]: returned by the value-returning
//!   [`get`](crate::traits::CachePolicy::get) when the key is absent.
//!
//! Anything else — an empty bucket during eviction, a ghost index pointing at
//! a missing node — is an internal invariant violation, asserted in debug
//! builds via the `debug_validate_invariants` methods and degraded safely in
//! release builds. Those never surface as `CacheError`.
//!
//! ## Example
//!
//! ```
//! use cachemux::error::CacheError;
//! use cachemux::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<u64, String>, CacheError> = LruCache::try_new(0);
//! assert!(matches!(cache, Err(CacheError::InvalidCapacity(_))));
//! ```

use std::fmt;

/// Error returned by fallible cache constructors and the value-returning
/// `get` variant.
///
/// # Example
///
/// ```
/// use cachemux::error::CacheError;
/// use cachemux::policy::lru::LruCache;
/// use cachemux::traits::CachePolicy;
///
/// let mut cache: LruCache<u64, &str> = LruCache::try_new(4).unwrap();
/// assert_eq!(cache.get(&1), Err(CacheError::NotFound));
///
/// let err = LruCache::<u64, &str>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A construction parameter was out of range. Carries a human-readable
    /// description of which parameter failed validation.
    InvalidCapacity(String),
    /// The key was not present in the cache.
    NotFound,
}

impl CacheError {
    /// Creates an `InvalidCapacity` error with the given description.
    #[inline]
    pub fn invalid_capacity(msg: impl Into<String>) -> Self {
        Self::InvalidCapacity(msg.into())
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity(msg) => f.write_str(msg),
            Self::NotFound => f.write_str("key not found in cache"),
        }
    }
}

impl std::error::Error for CacheError {}
