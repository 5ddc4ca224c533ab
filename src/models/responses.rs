//! Response DTOs for the feed API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::feed::{MutationKind, MutationOutcome};

/// Response body for every write endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    /// Which write was performed
    pub kind: MutationKind,
    /// What the write returned
    pub result: MutationOutcome,
}

impl MutationResponse {
    pub fn new(kind: MutationKind, result: MutationOutcome) -> Self {
        Self { kind, result }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub invalidations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Configured TTL in seconds
    pub ttl_seconds: u64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, ttl_seconds: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            ttl_seconds,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the cache is open, "degraded" otherwise
    pub status: String,
    pub cache_open: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(cache_open: bool) -> Self {
        let status = if cache_open { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            cache_open,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
