//! Follow/unfollow handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::identity::Viewer;

use super::AppState;
use super::error::ApiError;

pub async fn follow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Viewer,
) -> Result<impl IntoResponse, ApiError> {
    state.social.follow(viewer, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Viewer,
) -> Result<impl IntoResponse, ApiError> {
    state.social.unfollow(viewer, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
