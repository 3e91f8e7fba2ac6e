//! Cache key definitions.

/// Which feed scope a cached page belongs to. Only the global timeline is
/// ever cached today; the enum keeps the key honest about that rather than
/// leaving a bare page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachedScope {
    Global,
}

/// Key for one cached feed page: scope plus requested page number. The
/// viewer is deliberately absent; cached scopes render identically for
/// everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedCacheKey {
    pub scope: CachedScope,
    pub page: u32,
}

impl FeedCacheKey {
    pub fn global(page: u32) -> Self {
        Self {
            scope: CachedScope::Global,
            page,
        }
    }
}
