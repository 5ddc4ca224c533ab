//! Document store collaborators
//!
//! The feed service does not own the document store; it queries and writes
//! through these traits. Failures are reported as [`FeedError`] values and
//! passed through to callers unchanged.
//!
//! [`FeedError`]: crate::error::FeedError

use async_trait::async_trait;

use crate::error::Result;
use crate::feed::models::{
    Comment, FollowArgs, FollowResult, Like, NewComment, NewLike, NewPost, NewUser, Post, User,
};

/// Read side: already-denormalized post queries.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// All posts, newest first.
    async fn query_all_posts(&self) -> Result<Vec<Post>>;

    async fn query_post_by_id(&self, id: &str) -> Result<Option<Post>>;
}

/// Write side. Each call returns once the write is committed.
#[async_trait]
pub trait PostWriter: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post>;

    /// Appends a comment. An unknown `post_id` fails with `NotFound` rather
    /// than being ignored, and nothing is invalidated.
    async fn add_comment(&self, post_id: &str, input: NewComment) -> Result<Comment>;

    /// Toggles a like: liking twice removes the like and returns it.
    async fn add_like(&self, post_id: &str, input: NewLike) -> Result<Like>;

    /// Deletes the post and returns it as it was before deletion.
    async fn delete_post(&self, id: &str) -> Result<Post>;

    async fn follow(&self, args: FollowArgs) -> Result<FollowResult>;

    async fn unfollow(&self, args: FollowArgs) -> Result<FollowResult>;
}

/// User registration. Users are never cached; posts resolve their author,
/// comment and like users by id or username at query time.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Rejects a missing or short username, a malformed email, and a
    /// username or email that is already taken.
    async fn register_user(&self, input: NewUser) -> Result<User>;
}
