//! Cache key naming for feed data.

use std::fmt;

/// Key under which the full post feed is cached.
const FEED_ALL: &str = "feed:all";

/// Prefix for per-post keys (`post:<id>`).
const POST_PREFIX: &str = "post:";

/// A cache key: either the fixed feed key or a key parameterized by post id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn feed_all() -> Self {
        Self(FEED_ALL.to_string())
    }

    pub fn post(id: &str) -> Self {
        Self(format!("{}{}", POST_PREFIX, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
