//! Feed Service
//!
//! Serves post reads through the read-through cache and applies the
//! invalidation policy after every successful write.
//!
//! Accepted race: between a write committing and its keys being deleted, a
//! concurrent read can miss, re-fetch pre-write data and repopulate the key.
//! That entry is stale for at most the TTL, or until the next invalidating
//! write for the same key.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheResource, ReadThroughCache};
use crate::error::{FeedError, Result};
use crate::feed::invalidation::{InvalidationPolicy, Mutation, MutationKind};
use crate::feed::keys::CacheKey;
use crate::feed::models::{Comment, FollowResult, Like, Post};
use crate::feed::source::{PostSource, PostWriter};

/// What a write returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MutationOutcome {
    Post(Post),
    Comment(Comment),
    Like(Like),
    Follow(FollowResult),
}

#[derive(Clone)]
pub struct FeedService {
    cache: ReadThroughCache,
    policy: InvalidationPolicy,
    source: Arc<dyn PostSource>,
    writer: Arc<dyn PostWriter>,
    ttl_seconds: u64,
    cache_per_post: bool,
}

impl FeedService {
    pub fn new(
        cache: CacheResource,
        source: Arc<dyn PostSource>,
        writer: Arc<dyn PostWriter>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            cache: ReadThroughCache::new(cache),
            policy: InvalidationPolicy::new(),
            source,
            writer,
            ttl_seconds,
            cache_per_post: true,
        }
    }

    /// Disables caching of single-post reads; the feed stays cached.
    pub fn with_per_post_cache(mut self, enabled: bool) -> Self {
        self.cache_per_post = enabled;
        self
    }

    pub fn cache(&self) -> &CacheResource {
        self.cache.resource()
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    // == Reads ==
    /// All posts, newest first, served from `feed:all` while it is live.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let key = CacheKey::feed_all();
        self.cache
            .get_or_populate(key.as_str(), self.ttl_seconds, || self.source.query_all_posts())
            .await
    }

    /// One post, served from `post:<id>` while it is live.
    ///
    /// An unknown id yields `NotFound`, which is not cached.
    pub async fn get_post(&self, id: &str) -> Result<Post> {
        if !self.cache_per_post {
            return self.fetch_post(id).await;
        }

        let key = CacheKey::post(id);
        self.cache
            .get_or_populate(key.as_str(), self.ttl_seconds, || self.fetch_post(id))
            .await
    }

    async fn fetch_post(&self, id: &str) -> Result<Post> {
        self.source
            .query_post_by_id(id)
            .await?
            .ok_or_else(|| FeedError::NotFound(format!("Post not found: {}", id)))
    }

    // == Writes ==
    /// Performs the write, then deletes every key the policy names for it.
    ///
    /// Invalidation runs only after the write has returned successfully; a
    /// failed write propagates its error and leaves the cache untouched.
    pub async fn mutate(&self, mutation: Mutation) -> Result<MutationOutcome> {
        let kind = mutation.kind();
        let keys = self.policy.keys_for(&mutation);

        let outcome = match self.write(mutation).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("{} failed, cache left untouched: {}", kind, err);
                return Err(err);
            }
        };

        self.invalidate(kind, &keys).await;
        Ok(outcome)
    }

    async fn write(&self, mutation: Mutation) -> Result<MutationOutcome> {
        let outcome = match mutation {
            Mutation::CreatePost(input) => MutationOutcome::Post(self.writer.create_post(input).await?),
            Mutation::AddComment { post_id, comment } => {
                MutationOutcome::Comment(self.writer.add_comment(&post_id, comment).await?)
            }
            Mutation::AddLike { post_id, like } => {
                MutationOutcome::Like(self.writer.add_like(&post_id, like).await?)
            }
            Mutation::DeletePost { id } => MutationOutcome::Post(self.writer.delete_post(&id).await?),
            Mutation::Follow(args) => MutationOutcome::Follow(self.writer.follow(args).await?),
            Mutation::Unfollow(args) => MutationOutcome::Follow(self.writer.unfollow(args).await?),
        };
        Ok(outcome)
    }

    async fn invalidate(&self, kind: MutationKind, keys: &BTreeSet<CacheKey>) {
        for key in keys {
            match self.cache().delete(key.as_str()).await {
                Ok(true) => debug!("{} invalidated {}", kind, key),
                Ok(false) => debug!("{} found {} already absent", kind, key),
                Err(err) => warn!("{} could not invalidate {}: {}", kind, key, err),
            }
        }
        if !keys.is_empty() {
            info!("{} invalidated {} cache key(s)", kind, keys.len());
        }
    }
}
