//! Read-Through Cache Module
//!
//! Get-or-populate wrapper around [`CacheResource`]: serve a cached value
//! while it is live, otherwise fetch from the data source, store the result
//! with a TTL and return it.
//!
//! Concurrent misses on the same key are coalesced: one caller fetches while
//! the rest wait on a per-key lock and then re-read the store. A failed fetch
//! is never cached; the next waiter in line fetches for itself.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::cache::CacheResource;
use crate::error::{FeedError, Result};

type FlightMap = HashMap<String, Arc<AsyncMutex<()>>>;

// == Read Through Cache ==
#[derive(Debug, Clone)]
pub struct ReadThroughCache {
    cache: CacheResource,
    in_flight: Arc<Mutex<FlightMap>>,
}

impl ReadThroughCache {
    pub fn new(cache: CacheResource) -> Self {
        Self {
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The underlying cache resource.
    pub fn resource(&self) -> &CacheResource {
        &self.cache
    }

    // == Get Or Populate ==
    /// Returns the cached value for `key`, or fetches, caches and returns it.
    ///
    /// Errors from `fetch` propagate to the caller and leave the cache
    /// untouched. An unavailable cache degrades to "always miss".
    pub async fn get_or_populate<T, F, Fut>(&self, key: &str, ttl_seconds: u64, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = decode(key, self.cache.get(key).await) {
            debug!("Cache hit: {}", key);
            return Ok(value);
        }

        let flight = self.acquire_flight(key);
        let result = {
            let _leader = flight.lock().await;

            // Another caller may have populated the key while we waited.
            // This miss was already counted above.
            match decode(key, self.cache.peek(key).await) {
                Some(value) => {
                    debug!("Cache hit after coalesced wait: {}", key);
                    Ok(value)
                }
                None => {
                    debug!("Cache miss, fetching from source: {}", key);
                    let fetched = fetch().await;
                    if let Ok(value) = &fetched {
                        self.populate(key, value, ttl_seconds).await;
                    }
                    fetched
                }
            }
        };

        self.release_flight(key, flight);
        result
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let outcome = match serde_json::to_string(value) {
            Ok(blob) => self.cache.set(key, blob, ttl_seconds).await,
            Err(err) => Err(FeedError::from(err)),
        };

        match outcome {
            Ok(()) => debug!("Cached {} with TTL={}s", key, ttl_seconds),
            Err(err) => warn!("Failed to populate cache for {}: {}", key, err),
        }
    }

    fn acquire_flight(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut flights = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn release_flight(&self, key: &str, flight: Arc<AsyncMutex<()>>) {
        let mut flights = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Map plus our handle: nobody else is waiting on this key
        if Arc::strong_count(&flight) == 2 {
            flights.remove(key);
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Turns a raw cache read into a value, treating errors and bad blobs as a miss.
fn decode<T: DeserializeOwned>(key: &str, read: Result<Option<String>>) -> Option<T> {
    let raw = match read {
        Ok(raw) => raw?,
        Err(err) => {
            warn!("Cache read failed for {}, treating as miss: {}", key, err);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Discarding undecodable cache entry {}: {}", key, err);
            None
        }
    }
}
