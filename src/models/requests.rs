//! Request DTOs for the feed API
//!
//! Defines the structure of incoming HTTP request bodies. Each request
//! validates its required fields and converts into a [`Mutation`].

use serde::Deserialize;

use crate::feed::models::{FollowArgs, NewComment, NewLike, NewPost, NewUser};
use crate::feed::Mutation;

/// Request body for POST /posts
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    pub author_id: String,
}

impl CreatePostRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.content.trim().is_empty() {
            return Some("Content is required".to_string());
        }
        if self.author_id.trim().is_empty() {
            return Some("AuthorId is required".to_string());
        }
        None
    }

    pub fn into_mutation(self) -> Mutation {
        Mutation::CreatePost(NewPost {
            content: self.content,
            tags: self.tags,
            img_url: self.img_url,
            author_id: self.author_id,
        })
    }
}

/// Request body for POST /posts/:id/comments
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    pub username: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Option<String> {
        if self.content.trim().is_empty() {
            return Some("Comment content is required".to_string());
        }
        if self.username.trim().is_empty() {
            return Some("Comment username is required".to_string());
        }
        None
    }

    pub fn into_mutation(self, post_id: String) -> Mutation {
        Mutation::AddComment {
            post_id,
            comment: NewComment {
                content: self.content,
                username: self.username,
            },
        }
    }
}

/// Request body for POST /posts/:id/likes
#[derive(Debug, Clone, Deserialize)]
pub struct LikeRequest {
    pub username: String,
}

impl LikeRequest {
    pub fn validate(&self) -> Option<String> {
        if self.username.trim().is_empty() {
            return Some("Like username is required".to_string());
        }
        None
    }

    pub fn into_mutation(self, post_id: String) -> Mutation {
        Mutation::AddLike {
            post_id,
            like: NewLike {
                username: self.username,
            },
        }
    }
}

/// Request body for POST /follows and DELETE /follows
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub following_id: String,
    pub follower_id: String,
}

impl FollowRequest {
    pub fn validate(&self) -> Option<String> {
        if self.following_id.trim().is_empty() || self.follower_id.trim().is_empty() {
            return Some("followingId and followerId are required".to_string());
        }
        if self.following_id == self.follower_id {
            return Some("Users cannot follow themselves".to_string());
        }
        None
    }

    pub fn into_args(self) -> FollowArgs {
        FollowArgs {
            following_id: self.following_id,
            follower_id: self.follower_id,
        }
    }
}

/// Request body for POST /users
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub name: String,
    pub username: String,
    pub email: String,
}

impl RegisterUserRequest {
    /// Presence checks only; format and uniqueness belong to the registry.
    pub fn validate(&self) -> Option<String> {
        if self.username.trim().is_empty() {
            return Some("Username is required".to_string());
        }
        if self.email.trim().is_empty() {
            return Some("Email is required".to_string());
        }
        None
    }

    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            username: self.username,
            email: self.email,
        }
    }
}
