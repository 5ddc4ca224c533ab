//! In-memory document store
//!
//! Reference implementation of [`PostSource`], [`PostWriter`] and
//! [`UserRegistry`] used by the binary and the tests. Posts are stored with references only (author id,
//! usernames) and denormalized on every query.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{FeedError, Result};
use crate::feed::models::{
    Comment, Follow, FollowArgs, FollowResult, Like, NewComment, NewLike, NewPost, NewUser, Post,
    User,
};
use crate::feed::source::{PostSource, PostWriter, UserRegistry};

/// Something, `@`, something, `.`, something; no whitespace anywhere.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

const MIN_USERNAME_LEN: usize = 3;

#[derive(Debug, Default)]
struct Documents {
    users: HashMap<String, User>,
    /// Insertion order is creation order
    posts: Vec<Post>,
    follows: Vec<Follow>,
}

impl Documents {
    fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    fn post_mut(&mut self, id: &str) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(post_not_found)
    }

    fn follower_count(&self, user_id: &str) -> usize {
        self.follows
            .iter()
            .filter(|f| f.following_id == user_id)
            .count()
    }

    /// Inlines author, comment and like users.
    fn resolve(&self, stored: &Post) -> Post {
        let mut post = stored.clone();
        post.author = self.users.get(&post.author_id).map(User::summary);
        for comment in &mut post.comments {
            comment.user = self.user_by_username(&comment.username).map(User::summary);
        }
        for like in &mut post.likes {
            like.user = self.user_by_username(&like.username).map(User::summary);
        }
        post
    }
}

/// Thread-safe in-memory collection of users, posts and follows.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    docs: RwLock<Documents>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRegistry for InMemoryRepository {
    async fn register_user(&self, input: NewUser) -> Result<User> {
        require(&input.username, "Username is required")?;
        require(&input.email, "Email is required")?;
        if !EMAIL_REGEX.is_match(&input.email) {
            return Err(invalid("Invalid email format"));
        }
        if input.username.chars().count() < MIN_USERNAME_LEN {
            return Err(invalid("Username must be at least 3 characters"));
        }

        let mut docs = self.docs.write().await;
        if docs.user_by_username(&input.username).is_some() {
            return Err(invalid("Username already exists"));
        }
        if docs.users.values().any(|u| u.email == input.email) {
            return Err(invalid("Email already exists"));
        }

        let user = User {
            id: new_id(),
            username: input.username,
            name: input.name,
            email: input.email,
        };
        docs.users.insert(user.id.clone(), user.clone());
        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }
}

#[async_trait]
impl PostSource for InMemoryRepository {
    async fn query_all_posts(&self) -> Result<Vec<Post>> {
        let docs = self.docs.read().await;
        Ok(docs.posts.iter().rev().map(|p| docs.resolve(p)).collect())
    }

    async fn query_post_by_id(&self, id: &str) -> Result<Option<Post>> {
        let docs = self.docs.read().await;
        Ok(docs
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| docs.resolve(p)))
    }
}

#[async_trait]
impl PostWriter for InMemoryRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post> {
        require(&input.content, "Content is required")?;
        require(&input.author_id, "AuthorId is required")?;

        let now = Utc::now();
        let post = Post {
            id: new_id(),
            content: input.content,
            tags: input.tags,
            img_url: input.img_url,
            author_id: input.author_id,
            author: None,
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut docs = self.docs.write().await;
        docs.posts.push(post.clone());
        debug!("Stored post {}", post.id);
        Ok(docs.resolve(&post))
    }

    async fn add_comment(&self, post_id: &str, input: NewComment) -> Result<Comment> {
        require(&input.content, "Comment content is required")?;
        require(&input.username, "Comment username is required")?;

        let now = Utc::now();
        let comment = Comment {
            content: input.content,
            username: input.username,
            user: None,
            created_at: now,
            updated_at: now,
        };

        let mut docs = self.docs.write().await;
        let post = docs.post_mut(post_id)?;
        post.comments.push(comment.clone());
        post.updated_at = now;

        let user = docs.user_by_username(&comment.username).map(User::summary);
        Ok(Comment { user, ..comment })
    }

    async fn add_like(&self, post_id: &str, input: NewLike) -> Result<Like> {
        require(&input.username, "Like username is required")?;

        let now = Utc::now();
        let mut docs = self.docs.write().await;
        let post = docs.post_mut(post_id)?;

        let like = match post.likes.iter().position(|l| l.username == input.username) {
            Some(index) => post.likes.remove(index),
            None => {
                let like = Like {
                    username: input.username,
                    user: None,
                    created_at: now,
                    updated_at: now,
                };
                post.likes.push(like.clone());
                like
            }
        };
        post.updated_at = now;

        let user = docs.user_by_username(&like.username).map(User::summary);
        Ok(Like { user, ..like })
    }

    async fn delete_post(&self, id: &str) -> Result<Post> {
        let mut docs = self.docs.write().await;
        let index = docs
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(post_not_found)?;

        let removed = docs.posts.remove(index);
        Ok(docs.resolve(&removed))
    }

    async fn follow(&self, args: FollowArgs) -> Result<FollowResult> {
        let mut docs = self.docs.write().await;
        let already = docs
            .follows
            .iter()
            .any(|f| f.following_id == args.following_id && f.follower_id == args.follower_id);
        if already {
            return Ok(FollowResult {
                success: false,
                message: "Already following this user".to_string(),
                user: None,
                followers: None,
            });
        }

        let now = Utc::now();
        docs.follows.push(Follow {
            id: new_id(),
            following_id: args.following_id.clone(),
            follower_id: args.follower_id,
            created_at: now,
            updated_at: now,
        });

        Ok(FollowResult {
            success: true,
            message: "Following user successfully".to_string(),
            user: docs.users.get(&args.following_id).map(User::summary),
            followers: Some(docs.follower_count(&args.following_id)),
        })
    }

    async fn unfollow(&self, args: FollowArgs) -> Result<FollowResult> {
        let mut docs = self.docs.write().await;
        let before = docs.follows.len();
        docs.follows
            .retain(|f| !(f.following_id == args.following_id && f.follower_id == args.follower_id));

        if docs.follows.len() == before {
            return Ok(FollowResult {
                success: false,
                message: "Not following this user".to_string(),
                user: None,
                followers: None,
            });
        }

        Ok(FollowResult {
            success: true,
            message: "Unfollowed user successfully".to_string(),
            user: docs.users.get(&args.following_id).map(User::summary),
            followers: Some(docs.follower_count(&args.following_id)),
        })
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(invalid(message))
    } else {
        Ok(())
    }
}

fn invalid(message: &str) -> FeedError {
    FeedError::InvalidRequest(message.to_string())
}

fn post_not_found() -> FeedError {
    FeedError::NotFound("Post not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn register(repo: &InMemoryRepository, name: &str, username: &str) -> User {
        repo.register_user(NewUser {
            name: name.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
        })
        .await
        .unwrap()
    }

    fn new_post(author_id: &str, content: &str) -> NewPost {
        NewPost {
            content: content.to_string(),
            tags: Vec::new(),
            img_url: None,
            author_id: author_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_query_resolves_author() {
        let repo = InMemoryRepository::new();
        let alice = register(&repo, "Alice", "alice").await;

        let created = repo.create_post(new_post(&alice.id, "hello")).await.unwrap();
        assert_eq!(created.author.as_ref().unwrap().username, "alice");

        let fetched = repo.query_post_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_posts_are_newest_first() {
        let repo = InMemoryRepository::new();
        let first = repo.create_post(new_post("u1", "first")).await.unwrap();
        let second = repo.create_post(new_post("u1", "second")).await.unwrap();

        let ids: Vec<String> = repo
            .query_all_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_create_requires_content_and_author() {
        let repo = InMemoryRepository::new();

        let err = repo.create_post(new_post("u1", "  ")).await.unwrap_err();
        assert_eq!(err, FeedError::InvalidRequest("Content is required".to_string()));

        let err = repo.create_post(new_post("", "hi")).await.unwrap_err();
        assert_eq!(err, FeedError::InvalidRequest("AuthorId is required".to_string()));
    }

    #[tokio::test]
    async fn test_comment_resolves_user_and_missing_post_fails() {
        let repo = InMemoryRepository::new();
        register(&repo, "Bob", "bob").await;
        let post = repo.create_post(new_post("u1", "hi")).await.unwrap();

        let comment = repo
            .add_comment(
                &post.id,
                NewComment {
                    content: "nice".to_string(),
                    username: "bob".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.user.unwrap().name, "Bob");

        let stored = repo.query_post_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.comments.len(), 1);

        let missing = repo
            .add_comment(
                "nope",
                NewComment {
                    content: "x".to_string(),
                    username: "bob".to_string(),
                },
            )
            .await;
        assert!(matches!(missing, Err(FeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let repo = InMemoryRepository::new();
        let post = repo.create_post(new_post("u1", "hi")).await.unwrap();
        let like = || NewLike {
            username: "carol".to_string(),
        };

        repo.add_like(&post.id, like()).await.unwrap();
        let liked = repo.query_post_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(liked.likes.len(), 1);

        repo.add_like(&post.id, like()).await.unwrap();
        let unliked = repo.query_post_by_id(&post.id).await.unwrap().unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_post() {
        let repo = InMemoryRepository::new();
        let post = repo.create_post(new_post("u1", "bye")).await.unwrap();

        let deleted = repo.delete_post(&post.id).await.unwrap();
        assert_eq!(deleted.id, post.id);
        assert!(repo.query_post_by_id(&post.id).await.unwrap().is_none());

        let again = repo.delete_post(&post.id).await;
        assert_eq!(again, Err(FeedError::NotFound("Post not found".to_string())));
    }

    #[tokio::test]
    async fn test_follow_and_unfollow() {
        let repo = InMemoryRepository::new();
        let dave = register(&repo, "Dave", "dave").await;
        let args = FollowArgs {
            following_id: dave.id.clone(),
            follower_id: "u9".to_string(),
        };

        let followed = repo.follow(args.clone()).await.unwrap();
        assert!(followed.success);
        assert_eq!(followed.followers, Some(1));
        assert_eq!(followed.user.unwrap().username, "dave");

        let twice = repo.follow(args.clone()).await.unwrap();
        assert!(!twice.success);

        let unfollowed = repo.unfollow(args.clone()).await.unwrap();
        assert!(unfollowed.success);
        assert_eq!(unfollowed.followers, Some(0));

        assert!(!repo.unfollow(args).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_register_user_rules() {
        let repo = InMemoryRepository::new();
        let attempt = |username: &str, email: &str| NewUser {
            name: String::new(),
            username: username.to_string(),
            email: email.to_string(),
        };

        let cases = [
            (attempt("", "a@b.co"), "Username is required"),
            (attempt("erin", " "), "Email is required"),
            (attempt("erin", "erin@example"), "Invalid email format"),
            (attempt("erin", "erin @example.com"), "Invalid email format"),
            (attempt("ed", "ed@example.com"), "Username must be at least 3 characters"),
        ];
        for (input, message) in cases {
            assert_eq!(
                repo.register_user(input).await,
                Err(FeedError::InvalidRequest(message.to_string()))
            );
        }

        let erin = repo
            .register_user(attempt("erin", "erin@example.com"))
            .await
            .unwrap();
        assert_eq!(erin.username, "erin");

        assert_eq!(
            repo.register_user(attempt("erin", "other@example.com")).await,
            Err(FeedError::InvalidRequest("Username already exists".to_string()))
        );
        assert_eq!(
            repo.register_user(attempt("erin2", "erin@example.com")).await,
            Err(FeedError::InvalidRequest("Email already exists".to_string()))
        );
    }
}
