use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::application::feeds::FeedError;
use crate::application::posts::PostError;
use crate::application::repos::RepoError;
use crate::application::social::SocialError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "authentication required",
            None,
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    fn from_repo(err: RepoError) -> Self {
        error!(error = %err, "repository error surfaced to HTTP");
        match err {
            RepoError::NotFound => Self::not_found("resource not found"),
            RepoError::Timeout => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
                "database timeout",
                None,
            ),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
                "internal storage error",
                Some(other.to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::UnknownGroup => ApiError::not_found("group not found"),
            FeedError::UnknownAuthor => ApiError::not_found("author not found"),
            FeedError::Unauthorized => ApiError::unauthorized(),
            FeedError::Repo(repo) => ApiError::from_repo(repo),
        }
    }
}

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::AuthorNotFound => ApiError::not_found("author not found"),
            SocialError::Unauthorized => ApiError::unauthorized(),
            SocialError::Repo(repo) => ApiError::from_repo(repo),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound => ApiError::not_found("post not found"),
            PostError::UnknownGroup => ApiError::not_found("group not found"),
            PostError::Unauthorized => ApiError::unauthorized(),
            PostError::Validation { message } => {
                ApiError::bad_request("validation failed", Some(message))
            }
            PostError::Repo(repo) => ApiError::from_repo(repo),
        }
    }
}
