//! Post detail, authoring, and comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::posts::{NewPost, PostChanges};
use crate::domain::entities::{CommentRecord, FeedPostRecord};
use crate::domain::identity::Viewer;

use super::AppState;
use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PostCreateRequest {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostUpdateRequest {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentCreateRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
struct PostDetailBody {
    post: FeedPostRecord,
    comments: Vec<CommentRecord>,
}

pub async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.posts.post_detail(id).await?;
    Ok(Json(PostDetailBody {
        post: detail.post,
        comments: detail.comments,
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .posts
        .create_post(
            viewer,
            NewPost {
                text: payload.text,
                group_slug: payload.group,
                image: payload.image,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    viewer: Viewer,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .posts
        .edit_post(
            viewer,
            id,
            PostChanges {
                text: payload.text,
                group_slug: payload.group,
                image: payload.image,
            },
        )
        .await?;
    Ok(Json(updated))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    viewer: Viewer,
    Json(payload): Json<CommentCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state.posts.add_comment(viewer, id, &payload.text).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
