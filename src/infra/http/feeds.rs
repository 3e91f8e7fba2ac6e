//! Feed handlers: one per scope.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::pagination::Page;
use crate::domain::entities::{FeedPostRecord, GroupRecord, UserRecord};
use crate::domain::identity::Viewer;

use super::AppState;
use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    fn number(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

#[derive(Debug, Serialize)]
struct GroupFeedBody {
    group: GroupRecord,
    #[serde(flatten)]
    page: Page<FeedPostRecord>,
}

#[derive(Debug, Serialize)]
struct AuthorFeedBody {
    author: UserRecord,
    following: bool,
    #[serde(flatten)]
    page: Page<FeedPostRecord>,
}

pub async fn global_feed(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.feeds.global_timeline(query.number()).await?;
    Ok(Json(page))
}

pub async fn group_feed(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state.feeds.group_timeline(&slug, query.number()).await?;
    Ok(Json(GroupFeedBody {
        group: feed.group,
        page: feed.page,
    }))
}

pub async fn author_feed(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Viewer,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state
        .feeds
        .author_timeline(&username, viewer, query.number())
        .await?;
    Ok(Json(AuthorFeedBody {
        author: feed.author,
        following: feed.following,
        page: feed.page,
    }))
}

pub async fn personal_feed(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .feeds
        .personal_timeline(viewer, query.number())
        .await?;
    Ok(Json(page))
}
