//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries. Reads
//! already expire lazily; the sweep only keeps memory from holding entries
//! that are never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheResource;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The returned handle is aborted during graceful shutdown. Sweeps against a
/// closed cache are logged and skipped.
///
/// # Example
/// ```ignore
/// let cache = CacheResource::open();
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 5);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: CacheResource, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match cache.cleanup_expired().await {
                Ok(removed) if removed.is_empty() => {
                    debug!("TTL cleanup: no expired entries found")
                }
                Ok(removed) => {
                    info!("TTL cleanup: removed {} expired entries", removed.len());
                    debug!("TTL cleanup: expired keys {:?}", removed);
                }
                Err(err) => warn!("TTL cleanup skipped: {}", err),
            }
        }
    })
}
