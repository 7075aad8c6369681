pub use crate::builder::{Cache, CacheBuilder, PolicyKind};
pub use crate::concurrent::{
    ConcurrentArcCache, ConcurrentCache, ConcurrentLfuCache, ConcurrentLruCache,
    ConcurrentLruKCache,
};
pub use crate::ds::{GhostList, NodeHandle, OrderedKeyList, ShardSelector};
pub use crate::error::CacheError;
pub use crate::policy::{ArcCache, LfuCache, LruCache, LruKCache, ShardedLruCache};
pub use crate::traits::CachePolicy;

#[cfg(feature = "metrics")]
pub use crate::metrics::MetricsSnapshot;
