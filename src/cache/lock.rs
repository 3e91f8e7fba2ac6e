//! Poison-tolerant guards for the cache's interior lock.
//!
//! A panic while a guard is held cannot corrupt entries: pages are
//! immutable once stored and leave the map only through expiry or flush,
//! so the poisoned state is recovered instead of propagated.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn rw_read<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!(op, "recovered read access to a poisoned feed cache lock");
        poisoned.into_inner()
    })
}

pub(crate) fn rw_write<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!(op, "recovered write access to a poisoned feed cache lock");
        poisoned.into_inner()
    })
}
