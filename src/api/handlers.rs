//! API request handlers

use crate::api::query::{PageParams, UserDirectoryQuery};
use crate::api::viewer::Viewer;
use crate::error::SocialError;
use crate::neo4j::models::{CommentAnchor, LikeTarget, UserNode};
use crate::social::{
    CommentDetail, CreateCommentRequest, CreatePostRequest, CreateUserRequest, DegreeResponse,
    DirectoryUser, EnrichedComment, EnrichedPost, EnrichedUser, FeedItem, LikeOutcome, LikeToggle,
    PageRequest, PageResult, Suggestion, UnlikeOutcome, UpdatePostRequest, UpdateProfileRequest,
    UserProfile,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Health
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub neo4j: String,
}

/// Health check handler: 200 when Neo4j answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let neo4j_ok = state.neo4j.health_check().await.unwrap_or(false);

    let (http_status, status) = if neo4j_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            neo4j: if neo4j_ok {
                "connected".to_string()
            } else {
                "disconnected".to_string()
            },
        }),
    )
}

fn page_request(state: &AppState, params: &PageParams) -> Result<PageRequest, AppError> {
    Ok(state.config.page_request(params.page, params.page_size)?)
}

// ============================================================================
// Users
// ============================================================================

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserNode>), AppError> {
    let user = state.engine.users().create_user(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(page): Query<PageParams>,
    Query(query): Query<UserDirectoryQuery>,
) -> Result<Json<PageResult<DirectoryUser>>, AppError> {
    let page = page_request(&state, &page)?;
    let result = state
        .engine
        .users()
        .list_users(viewer.0, &query.to_filter(), page)
        .await?;
    Ok(Json(result))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.engine.users().get_profile(user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.engine.users().update_profile(viewer.0, req).await?))
}

pub async fn list_followers(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedUser>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state
            .engine
            .users()
            .followers(user_id, viewer.0, page)
            .await?,
    ))
}

pub async fn list_following(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedUser>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state
            .engine
            .users()
            .following(user_id, viewer.0, page)
            .await?,
    ))
}

/// Response of follow / unfollow
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
    /// False when the call was a no-op
    pub changed: bool,
}

pub async fn follow(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FollowResponse>, AppError> {
    let changed = state.engine.actions().follow(viewer.0, user_id).await?;
    Ok(Json(FollowResponse {
        following: viewer.0 != user_id,
        changed,
    }))
}

pub async fn unfollow(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FollowResponse>, AppError> {
    let changed = state.engine.actions().unfollow(viewer.0, user_id).await?;
    Ok(Json(FollowResponse {
        following: false,
        changed,
    }))
}

pub async fn get_degree(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DegreeResponse>, AppError> {
    let degree = state.engine.degree().degree(viewer.0, user_id).await?;
    Ok(Json(DegreeResponse {
        viewer: viewer.0,
        target: user_id,
        degree,
    }))
}

pub async fn list_user_posts(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedPost>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state
            .engine
            .content()
            .user_posts(user_id, viewer.0, page)
            .await?,
    ))
}

// ============================================================================
// Discovery
// ============================================================================

pub async fn suggestions(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<Suggestion>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(state.engine.suggestions().suggest(viewer.0, page).await?))
}

pub async fn feed(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<FeedItem>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(state.engine.feed().feed(viewer.0, page).await?))
}

pub async fn following_feed(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedPost>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state.engine.feed().following_posts(viewer.0, page).await?,
    ))
}

pub async fn second_degree_feed(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedPost>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state
            .engine
            .feed()
            .second_degree_posts(viewer.0, page)
            .await?,
    ))
}

// ============================================================================
// Posts
// ============================================================================

pub async fn create_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<EnrichedPost>), AppError> {
    let post = state.engine.content().create_post(viewer.0, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
) -> Result<Json<EnrichedPost>, AppError> {
    Ok(Json(state.engine.content().get_post(viewer.0, post_id).await?))
}

pub async fn update_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<EnrichedPost>, AppError> {
    Ok(Json(
        state
            .engine
            .content()
            .update_post(viewer.0, post_id, req)
            .await?,
    ))
}

pub async fn delete_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.engine.content().delete_post(viewer.0, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeOutcome>, AppError> {
    Ok(Json(
        state
            .engine
            .actions()
            .like(viewer.0, LikeTarget::Post(post_id))
            .await?,
    ))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
) -> Result<Json<UnlikeOutcome>, AppError> {
    Ok(Json(
        state
            .engine
            .actions()
            .unlike(viewer.0, LikeTarget::Post(post_id))
            .await?,
    ))
}

pub async fn list_post_comments(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedComment>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state
            .engine
            .content()
            .comments(CommentAnchor::Post(post_id), viewer.0, page)
            .await?,
    ))
}

// ============================================================================
// Comments
// ============================================================================

pub async fn create_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<EnrichedComment>), AppError> {
    let comment = state.engine.content().create_comment(viewer.0, req).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<CommentDetail>, AppError> {
    Ok(Json(
        state
            .engine
            .content()
            .get_comment(viewer.0, comment_id)
            .await?,
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(comment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .engine
        .content()
        .delete_comment(viewer.0, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_replies(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(comment_id): Path<Uuid>,
    Query(page): Query<PageParams>,
) -> Result<Json<PageResult<EnrichedComment>>, AppError> {
    let page = page_request(&state, &page)?;
    Ok(Json(
        state
            .engine
            .content()
            .comments(CommentAnchor::Reply(comment_id), viewer.0, page)
            .await?,
    ))
}

pub async fn toggle_comment_like(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<LikeToggle>, AppError> {
    Ok(Json(
        state
            .engine
            .actions()
            .toggle_like(viewer.0, LikeTarget::Comment(comment_id))
            .await?,
    ))
}

// ============================================================================
// Error handling
// ============================================================================

/// API error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<SocialError> for AppError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::NotFound { .. } => AppError::NotFound(err.to_string()),
            SocialError::InvalidInput(msg) => AppError::BadRequest(msg),
            SocialError::Forbidden(msg) => AppError::Forbidden(msg),
            SocialError::AlreadyExists(msg) => AppError::Conflict(msg),
            SocialError::StoreUnavailable(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: SocialError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_social_error_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_of(SocialError::user_not_found(id)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(SocialError::InvalidInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SocialError::Forbidden("nope".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(SocialError::AlreadyExists("dup".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(SocialError::StoreUnavailable(anyhow::anyhow!("down"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_keeps_entity_in_message() {
        let id = Uuid::nil();
        match AppError::from(SocialError::post_not_found(id)) {
            AppError::NotFound(msg) => assert!(msg.starts_with("Post not found")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
