use std::time::Duration;

pub const DEFAULT_FEED_TTL_SECS: u64 = 20;

/// Cache tuning knobs, constructed from settings at startup.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// How long a cached global-timeline page stays valid. Expiry is the
    /// only implicit invalidation; writes never touch the cache.
    pub feed_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            feed_ttl: Duration::from_secs(DEFAULT_FEED_TTL_SECS),
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(feed_ttl: Duration) -> Self {
        Self { feed_ttl }
    }
}
