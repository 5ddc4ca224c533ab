//! Cache Module
//!
//! In-memory TTL cache for serialized query results, its lifecycle-managed
//! shared handle, and the read-through layer built on top of it.

mod clock;
mod entry;
mod read_through;
mod resource;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use read_through::ReadThroughCache;
pub use resource::CacheResource;
pub use stats::CacheStats;
pub use store::CacheStore;
