//! Request and Response models for the feed API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CommentRequest, CreatePostRequest, FollowRequest, LikeRequest, RegisterUserRequest,
};
pub use responses::{HealthResponse, MutationResponse, StatsResponse};
