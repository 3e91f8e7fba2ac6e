//! TTL-bounded storage for rendered feed pages.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use metrics::counter;

use crate::application::pagination::Page;
use crate::domain::entities::FeedPostRecord;

use super::config::CacheConfig;
use super::keys::FeedCacheKey;
use super::lock::{rw_read, rw_write};

struct CacheEntry {
    stored_at: Instant,
    page: Page<FeedPostRecord>,
}

/// In-memory cache for assembled feed pages.
///
/// Entries are immutable once written and leave the map only through
/// expiry or an explicit flush. Constructed once at startup and injected
/// wherever it is read, never a hidden singleton.
pub struct FeedCache {
    config: CacheConfig,
    entries: RwLock<HashMap<FeedCacheKey, CacheEntry>>,
}

impl FeedCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a cached page if it is still inside the freshness window.
    /// Expired entries are dropped on the way out.
    pub fn get(&self, key: &FeedCacheKey) -> Option<Page<FeedPostRecord>> {
        let expired = {
            let guard = rw_read(&self.entries, "get");
            match guard.get(key) {
                None => {
                    counter!("tribuna_feed_cache_miss_total").increment(1);
                    return None;
                }
                Some(entry) => {
                    if entry.stored_at.elapsed() < self.config.feed_ttl {
                        counter!("tribuna_feed_cache_hit_total").increment(1);
                        return Some(entry.page.clone());
                    }
                    true
                }
            }
        };

        if expired {
            counter!("tribuna_feed_cache_expired_total").increment(1);
            let mut guard = rw_write(&self.entries, "evict_expired");
            if let Some(entry) = guard.get(key) {
                if entry.stored_at.elapsed() >= self.config.feed_ttl {
                    guard.remove(key);
                }
            }
        }
        None
    }

    pub fn insert(&self, key: FeedCacheKey, page: Page<FeedPostRecord>) {
        let mut guard = rw_write(&self.entries, "insert");
        // Expired entries otherwise linger until their exact key is read
        // again; sweeping here keeps the map bounded by live keys.
        let ttl = self.config.feed_ttl;
        guard.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        guard.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                page,
            },
        );
    }

    /// Drop every entry immediately, regardless of age.
    pub fn flush(&self) {
        counter!("tribuna_feed_cache_flush_total").increment(1);
        rw_write(&self.entries, "flush").clear();
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
