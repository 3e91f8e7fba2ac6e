//! Viewer identity extraction.
//!
//! Authentication is an external collaborator; by the time a request gets
//! here it either carries a verified opaque user id in `X-User-Id` or it
//! is anonymous. A malformed header is treated as anonymous rather than
//! rejected, so the extractor is infallible.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::domain::identity::Viewer;

pub const USER_ID_HEADER: &str = "x-user-id";

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let viewer = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .map(Viewer::User)
            .unwrap_or(Viewer::Anonymous);
        Ok(viewer)
    }
}
