//! Cache Store Module
//!
//! Key/value storage of serialized query results with per-key TTL and lazy
//! expiry on read.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == Cache Store ==
/// TTL-only cache storage. One entry per key; no other eviction policy.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty CacheStore driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for `key` and resetting
    /// its deadline to `now + ttl_seconds`.
    pub fn set(&mut self, key: &str, value: String, ttl_seconds: u64) {
        let entry = CacheEntry::new(key.to_string(), value, ttl_seconds, self.clock.now_ms());
        self.entries.insert(key.to_string(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value if present and not expired, counting a hit or miss.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let value = self.live_value(key);
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Peek ==
    /// Like [`get`](Self::get) but leaves the hit and miss counters alone.
    ///
    /// Used to re-check a key that the same caller already counted.
    pub fn peek(&mut self, key: &str) -> Option<String> {
        self.live_value(key)
    }

    fn live_value(&mut self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let entry = self.entries.get(key)?;
        if !entry.is_expired_at(now) {
            return Some(entry.value.clone());
        }

        self.entries.remove(key);
        self.stats.record_expirations(1);
        self.stats.set_total_entries(self.entries.len());
        None
    }

    // == Delete ==
    /// Removes the entry for `key`. Deleting an absent key is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.stats.record_invalidation();
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the keys of the removed entries.
    pub fn cleanup_expired(&mut self) -> Vec<String> {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::time::Duration;

    fn store_with_clock() -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (CacheStore::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();

        store.set("feed:all", "[]".to_string(), 60);

        assert_eq!(store.get("feed:all").as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new();

        store.set("post:1", "{}".to_string(), 60);
        assert!(store.delete("post:1"));

        assert!(store.is_empty());
        assert!(store.get("post:1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let mut store = CacheStore::new();

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.stats().invalidations, 0);
    }

    #[test]
    fn test_store_overwrite_resets_deadline() {
        let (mut store, clock) = store_with_clock();

        store.set("k", "v1".to_string(), 10);
        clock.advance(Duration::from_secs(8));
        store.set("k", "v2".to_string(), 10);
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lazy_expiry_removes_entry() {
        let (mut store, clock) = store_with_clock();

        store.set("k", "v".to_string(), 1);
        assert!(store.get("k").is_some());

        clock.advance(Duration::from_secs(1));

        assert!(store.get("k").is_none());
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new();

        store.set("k", "v".to_string(), 60);
        store.get("k"); // hit
        store.get("nonexistent"); // miss
        store.delete("k");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_store_peek_does_not_count() {
        let (mut store, clock) = store_with_clock();
        store.set("k", "v".to_string(), 1);

        assert_eq!(store.peek("k").as_deref(), Some("v"));
        assert!(store.peek("missing").is_none());

        clock.advance(Duration::from_secs(1));
        assert!(store.peek("k").is_none());
        assert!(store.is_empty());

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock();

        store.set("short", "v".to_string(), 1);
        store.set("long", "v".to_string(), 10);

        clock.advance(Duration::from_secs(2));

        assert_eq!(store.cleanup_expired(), vec!["short".to_string()]);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }
}
