//! API route definitions

use super::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Users
        // ====================================================================
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/me", axum::routing::patch(handlers::update_profile))
        .route("/api/users/{user_id}", get(handlers::get_profile))
        .route(
            "/api/users/{user_id}/followers",
            get(handlers::list_followers),
        )
        .route(
            "/api/users/{user_id}/following",
            get(handlers::list_following),
        )
        .route(
            "/api/users/{user_id}/follow",
            post(handlers::follow).delete(handlers::unfollow),
        )
        .route("/api/users/{user_id}/degree", get(handlers::get_degree))
        .route("/api/users/{user_id}/posts", get(handlers::list_user_posts))
        // ====================================================================
        // Discovery
        // ====================================================================
        .route("/api/suggestions", get(handlers::suggestions))
        .route("/api/feed", get(handlers::feed))
        .route("/api/feed/following", get(handlers::following_feed))
        .route("/api/feed/second-degree", get(handlers::second_degree_feed))
        // ====================================================================
        // Posts
        // ====================================================================
        .route("/api/posts", post(handlers::create_post))
        .route(
            "/api/posts/{post_id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route(
            "/api/posts/{post_id}/like",
            post(handlers::like_post).delete(handlers::unlike_post),
        )
        .route(
            "/api/posts/{post_id}/comments",
            get(handlers::list_post_comments),
        )
        // ====================================================================
        // Comments
        // ====================================================================
        .route("/api/comments", post(handlers::create_comment))
        .route(
            "/api/comments/{comment_id}",
            get(handlers::get_comment).delete(handlers::delete_comment),
        )
        .route(
            "/api/comments/{comment_id}/replies",
            get(handlers::list_replies),
        )
        .route(
            "/api/comments/{comment_id}/like",
            post(handlers::toggle_comment_like),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
