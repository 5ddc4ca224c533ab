//! API Handlers
//!
//! HTTP request handlers for the feed endpoints. Reads go through the
//! cached feed service; post and follow writes go through `FeedService::mutate`
//! so the invalidation policy is applied in one place. User registration goes
//! straight to the registry since nothing cached is keyed by user.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheResource;
use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::feed::models::{Post, User};
use crate::feed::{FeedService, InMemoryRepository, Mutation, UserRegistry};
use crate::models::{
    CommentRequest, CreatePostRequest, FollowRequest, HealthResponse, LikeRequest,
    MutationResponse, RegisterUserRequest, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedService,
    pub users: Arc<dyn UserRegistry>,
}

impl AppState {
    pub fn new(feed: FeedService, users: Arc<dyn UserRegistry>) -> Self {
        Self { feed, users }
    }

    /// Builds the state from configuration, backed by an in-memory document
    /// store and the given cache resource.
    pub fn from_config(config: &Config, cache: CacheResource) -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let feed = FeedService::new(cache, repo.clone(), repo.clone(), config.ttl_seconds)
            .with_per_post_cache(config.cache_per_post);
        Self::new(feed, repo)
    }
}

async fn apply(state: &AppState, mutation: Mutation) -> Result<Json<MutationResponse>> {
    let kind = mutation.kind();
    let outcome = state.feed.mutate(mutation).await?;
    Ok(Json(MutationResponse::new(kind, outcome)))
}

fn check(problem: Option<String>) -> Result<()> {
    match problem {
        Some(msg) => Err(FeedError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for GET /posts
pub async fn list_posts_handler(State(state): State<AppState>) -> Result<Json<Vec<Post>>> {
    Ok(Json(state.feed.list_posts().await?))
}

/// Handler for GET /posts/:id
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    Ok(Json(state.feed.get_post(&id).await?))
}

/// Handler for POST /posts
pub async fn create_post_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    check(req.validate())?;
    let response = apply(&state, req.into_mutation()).await?;
    Ok((StatusCode::CREATED, response))
}

/// Handler for POST /posts/:id/comments
pub async fn comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<MutationResponse>> {
    check(req.validate())?;
    apply(&state, req.into_mutation(id)).await
}

/// Handler for POST /posts/:id/likes
pub async fn like_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LikeRequest>,
) -> Result<Json<MutationResponse>> {
    check(req.validate())?;
    apply(&state, req.into_mutation(id)).await
}

/// Handler for DELETE /posts/:id
pub async fn delete_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>> {
    apply(&state, Mutation::DeletePost { id }).await
}

/// Handler for POST /follows
pub async fn follow_handler(
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<MutationResponse>> {
    check(req.validate())?;
    apply(&state, Mutation::Follow(req.into_args())).await
}

/// Handler for DELETE /follows
pub async fn unfollow_handler(
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<MutationResponse>> {
    check(req.validate())?;
    apply(&state, Mutation::Unfollow(req.into_args())).await
}

/// Handler for POST /users
pub async fn register_user_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    check(req.validate())?;
    let user = state.users.register_user(req.into_new_user()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.feed.cache().stats().await?;
    Ok(Json(StatsResponse::new(&stats, state.feed.ttl_seconds())))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.feed.cache().is_open().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MutationOutcome;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default(), CacheResource::open())
    }

    fn create_request(content: &str) -> CreatePostRequest {
        CreatePostRequest {
            content: content.to_string(),
            tags: vec!["t".to_string()],
            img_url: None,
            author_id: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();

        let (status, Json(created)) =
            create_post_handler(State(state.clone()), Json(create_request("hello")))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(matches!(created.result, MutationOutcome::Post(_)));

        let Json(posts) = list_posts_handler(State(state)).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].tags, vec!["t".to_string()]);
    }

    #[tokio::test]
    async fn test_create_invalid_request() {
        let state = test_state();

        let result = create_post_handler(State(state), Json(create_request(""))).await;
        assert!(matches!(result, Err(FeedError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let state = test_state();

        let result = get_post_handler(State(state), Path("nope".to_string())).await;
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_counts_feed_reads() {
        let state = test_state();
        list_posts_handler(State(state.clone())).await.unwrap();
        list_posts_handler(State(state.clone())).await.unwrap();

        let Json(stats) = stats_handler(State(state)).await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.ttl_seconds, 60);
    }

    #[tokio::test]
    async fn test_registered_user_resolves_as_author() {
        let state = test_state();
        let (status, Json(user)) = register_user_handler(
            State(state.clone()),
            Json(RegisterUserRequest {
                name: "Alice".to_string(),
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let request = CreatePostRequest {
            author_id: user.id.clone(),
            ..create_request("hello")
        };
        create_post_handler(State(state.clone()), Json(request))
            .await
            .unwrap();

        let Json(posts) = list_posts_handler(State(state)).await.unwrap();
        assert_eq!(posts[0].author.as_ref().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_register_user_rejects_bad_email() {
        let state = test_state();
        let err = register_user_handler(
            State(state),
            Json(RegisterUserRequest {
                name: String::new(),
                username: "alice".to_string(),
                email: "not-an-email".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, FeedError::InvalidRequest("Invalid email format".to_string()));
    }

    #[tokio::test]
    async fn test_health_reflects_cache_lifecycle() {
        let state = test_state();
        assert_eq!(health_handler(State(state.clone())).await.status, "healthy");

        state.feed.cache().close().await;
        assert_eq!(health_handler(State(state)).await.status, "degraded");
    }
}
