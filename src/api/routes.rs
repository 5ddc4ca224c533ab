//! API Routes
//!
//! Configures the Axum router with all feed endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    comment_handler, create_post_handler, delete_post_handler, follow_handler, get_post_handler,
    health_handler, like_handler, list_posts_handler, register_user_handler, stats_handler,
    unfollow_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /posts` - Cached post feed
/// - `POST /posts` - Create a post
/// - `GET /posts/:id` - Cached single post
/// - `DELETE /posts/:id` - Delete a post
/// - `POST /posts/:id/comments` - Comment on a post
/// - `POST /posts/:id/likes` - Toggle a like
/// - `POST /follows` / `DELETE /follows` - Follow / unfollow a user
/// - `POST /users` - Register a user
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/posts", get(list_posts_handler).post(create_post_handler))
        .route("/posts/:id", get(get_post_handler).delete(delete_post_handler))
        .route("/posts/:id/comments", post(comment_handler))
        .route("/posts/:id/likes", post(like_handler))
        .route("/follows", post(follow_handler).delete(unfollow_handler))
        .route("/users", post(register_user_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheResource;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default(), CacheResource::open()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_posts_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/posts/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
