//! Global-timeline cache.
//!
//! Only the global feed scope is memoized: it is the hottest page, it is
//! identical for every viewer, and invalidating it across every write path
//! (posts, comments, follows) would buy little. Entries simply expire after
//! a fixed interval; `flush` exists for callers that need determinism.

mod config;
mod keys;
mod lock;
mod store;

pub use config::CacheConfig;
pub use keys::{CachedScope, FeedCacheKey};
pub use store::FeedCache;
