//! Cache Resource Module
//!
//! Process-wide handle to the cache store with an explicit lifecycle: opened
//! once at startup, borrowed per operation, closed at shutdown. Operations on
//! a closed resource report [`FeedError::CacheUnavailable`] instead of
//! reconnecting behind the caller's back.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore, Clock, SystemClock};
use crate::error::{FeedError, Result};

/// Shared, lockable cache store. Cloning yields another handle to the same store.
///
/// Every operation takes the single store lock for its whole duration, so a
/// reader never observes a half-written entry and racing `set`/`delete` calls
/// on one key serialize into one of the two end states.
#[derive(Debug, Clone)]
pub struct CacheResource {
    inner: Arc<RwLock<Option<CacheStore>>>,
}

impl CacheResource {
    // == Lifecycle ==
    /// Opens a cache backed by the system clock.
    pub fn open() -> Self {
        Self::open_with_clock(Arc::new(SystemClock))
    }

    /// Opens a cache backed by the given clock.
    pub fn open_with_clock(clock: Arc<dyn Clock>) -> Self {
        info!("Cache resource opened");
        Self {
            inner: Arc::new(RwLock::new(Some(CacheStore::with_clock(clock)))),
        }
    }

    /// Releases the store. Subsequent operations fail with `CacheUnavailable`.
    pub async fn close(&self) {
        let mut guard = self.inner.write().await;
        if let Some(store) = guard.take() {
            info!("Cache resource closed, dropped {} entries", store.len());
        }
    }

    pub async fn is_open(&self) -> bool {
        self.inner.read().await.is_some()
    }

    // == Operations ==
    /// Returns the live value for `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: a read may drop an expired entry and updates stats
        let mut guard = self.inner.write().await;
        Ok(open_store(&mut guard)?.get(key))
    }

    /// Re-reads `key` without counting a hit or miss.
    pub async fn peek(&self, key: &str) -> Result<Option<String>> {
        let mut guard = self.inner.write().await;
        Ok(open_store(&mut guard)?.peek(key))
    }

    pub async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut guard = self.inner.write().await;
        open_store(&mut guard)?.set(key, value, ttl_seconds);
        Ok(())
    }

    /// Removes `key`. Returns whether an entry existed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut guard = self.inner.write().await;
        Ok(open_store(&mut guard)?.delete(key))
    }

    /// Sweeps expired entries and returns their keys.
    pub async fn cleanup_expired(&self) -> Result<Vec<String>> {
        let mut guard = self.inner.write().await;
        Ok(open_store(&mut guard)?.cleanup_expired())
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        match self.inner.read().await.as_ref() {
            Some(store) => Ok(store.stats()),
            None => Err(unavailable()),
        }
    }
}

fn open_store(slot: &mut Option<CacheStore>) -> Result<&mut CacheStore> {
    match slot.as_mut() {
        Some(store) => Ok(store),
        None => {
            warn!("Cache operation attempted on a closed cache");
            Err(unavailable())
        }
    }
}

fn unavailable() -> FeedError {
    FeedError::CacheUnavailable("cache resource is closed".to_string())
}
