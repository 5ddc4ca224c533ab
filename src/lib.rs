//! Feed Cache - read-through caching for a social media post feed
//!
//! Serves the post feed and single posts from a TTL cache, populating it on
//! miss and invalidating affected keys after every successful write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{FeedError, Result};
pub use tasks::spawn_cleanup_task;
