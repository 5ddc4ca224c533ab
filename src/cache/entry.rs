//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry: a serialized query result and its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Key the entry is stored under
    pub key: String,
    /// The serialized value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), always set
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` after `now_ms`.
    ///
    /// # Arguments
    /// * `key` - The key the entry belongs to
    /// * `value` - The serialized value to store
    /// * `ttl_seconds` - TTL in seconds
    /// * `now_ms` - Current time in Unix milliseconds
    pub fn new(key: String, value: String, ttl_seconds: u64, now_ms: u64) -> Self {
        Self {
            key,
            value,
            expires_at: now_ms.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is expired once `now_ms >= expires_at`, so
    /// a TTL of zero yields an entry that is already logically absent.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
