//! Concrete eviction policies implementing
//! [`CachePolicy`](crate::traits::CachePolicy).

pub mod arc;
pub mod lfu;
pub mod lru;
pub mod lru_k;
pub mod sharded;

pub use arc::ArcCache;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use lru_k::LruKCache;
pub use sharded::ShardedLruCache;
