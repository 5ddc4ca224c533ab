//! Error types for the feed cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Feed Error Enum ==
/// Unified error type for the cache layer, the feed service and the API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache resource is closed or otherwise unreachable
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Failure reported by the document collaborator (query or write)
    #[error("{0}")]
    Source(String),

    /// Value could not be serialized for the cache
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Serialization(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = match &self {
            FeedError::NotFound(_) => StatusCode::NOT_FOUND,
            FeedError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FeedError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            FeedError::Source(_) => StatusCode::BAD_GATEWAY,
            FeedError::Serialization(_) | FeedError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the feed cache.
pub type Result<T> = std::result::Result<T, FeedError>;
