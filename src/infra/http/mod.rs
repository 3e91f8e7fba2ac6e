//! HTTP adapter: router, state, handlers.

pub mod error;
mod feeds;
mod identity;
mod posts;
mod social;

pub use identity::USER_ID_HEADER;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::application::{feeds::FeedService, posts::PostService, social::SocialGraphService};
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AppState {
    pub feeds: FeedService,
    pub posts: PostService,
    pub social: SocialGraphService,
    /// Absent in router tests that run against in-memory repositories.
    pub db: Option<Arc<PostgresRepositories>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/feed", get(feeds::global_feed))
        .route("/api/feed/following", get(feeds::personal_feed))
        .route("/api/groups/{slug}/feed", get(feeds::group_feed))
        .route("/api/authors/{username}/feed", get(feeds::author_feed))
        .route(
            "/api/authors/{username}/follow",
            post(social::follow).delete(social::unfollow),
        )
        .route("/api/posts", post(posts::create_post))
        .route(
            "/api/posts/{id}",
            get(posts::post_detail).put(posts::edit_post),
        )
        .route("/api/posts/{id}/comments", post(posts::add_comment))
        .route("/healthz", get(health))
        .with_state(state)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => (StatusCode::OK, "ok"),
            Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "database unreachable"),
        },
        None => (StatusCode::SERVICE_UNAVAILABLE, "no database configured"),
    }
}
