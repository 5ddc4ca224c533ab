//! Invalidation Policy
//!
//! Single table mapping each kind of write to the cache keys it makes stale.
//! Every mutation the feed service accepts goes through [`InvalidationPolicy::keys_for`],
//! so coverage is auditable here instead of being spread across handlers.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::feed::keys::CacheKey;
use crate::feed::models::{FollowArgs, NewComment, NewLike, NewPost};

/// Write kinds accepted by the feed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    CreatePost,
    AddComment,
    AddLike,
    DeletePost,
    Follow,
    Unfollow,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::CreatePost => "create-post",
            MutationKind::AddComment => "add-comment",
            MutationKind::AddLike => "add-like",
            MutationKind::DeletePost => "delete-post",
            MutationKind::Follow => "follow",
            MutationKind::Unfollow => "unfollow",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A write request together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreatePost(NewPost),
    AddComment { post_id: String, comment: NewComment },
    AddLike { post_id: String, like: NewLike },
    DeletePost { id: String },
    Follow(FollowArgs),
    Unfollow(FollowArgs),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreatePost(_) => MutationKind::CreatePost,
            Mutation::AddComment { .. } => MutationKind::AddComment,
            Mutation::AddLike { .. } => MutationKind::AddLike,
            Mutation::DeletePost { .. } => MutationKind::DeletePost,
            Mutation::Follow(_) => MutationKind::Follow,
            Mutation::Unfollow(_) => MutationKind::Unfollow,
        }
    }
}

/// Maps mutations to the cache keys they invalidate. Pure and stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidationPolicy;

impl InvalidationPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn keys_for(&self, mutation: &Mutation) -> BTreeSet<CacheKey> {
        match mutation {
            Mutation::CreatePost(_) => BTreeSet::from([CacheKey::feed_all()]),
            Mutation::AddComment { post_id, .. } | Mutation::AddLike { post_id, .. } => {
                BTreeSet::from([CacheKey::feed_all(), CacheKey::post(post_id)])
            }
            Mutation::DeletePost { id } => {
                BTreeSet::from([CacheKey::feed_all(), CacheKey::post(id)])
            }
            // Profile and follower data is not cached
            Mutation::Follow(_) | Mutation::Unfollow(_) => BTreeSet::new(),
        }
    }
}
