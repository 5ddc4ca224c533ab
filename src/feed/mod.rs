//! Feed Module
//!
//! Post feed domain: cache keys, models, document store collaborators, the
//! invalidation policy and the service tying them to the cache.

pub mod invalidation;
pub mod keys;
pub mod memory;
pub mod models;
pub mod service;
pub mod source;

pub use invalidation::{InvalidationPolicy, Mutation, MutationKind};
pub use keys::CacheKey;
pub use memory::InMemoryRepository;
pub use service::{FeedService, MutationOutcome};
pub use source::{PostSource, PostWriter, UserRegistry};
