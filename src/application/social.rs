//! Follow-edge management: the social graph behind the personal feed.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{FollowsRepo, RepoError, UsersRepo};
use crate::domain::entities::FollowRecord;
use crate::domain::identity::Viewer;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("author not found")]
    AuthorNotFound,
    #[error("operation requires an authenticated identity")]
    Unauthorized,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct SocialGraphService {
    users: Arc<dyn UsersRepo>,
    follows: Arc<dyn FollowsRepo>,
}

impl SocialGraphService {
    pub fn new(users: Arc<dyn UsersRepo>, follows: Arc<dyn FollowsRepo>) -> Self {
        Self { users, follows }
    }

    /// True iff the viewer follows `author_id`. Anonymous viewers never
    /// follow anyone; storage is not consulted for them.
    pub async fn is_following(
        &self,
        viewer: Viewer,
        author_id: Uuid,
    ) -> Result<bool, SocialError> {
        let Some(user_id) = viewer.user_id() else {
            return Ok(false);
        };
        Ok(self.follows.edge_exists(user_id, author_id).await?)
    }

    /// Create the follow edge idempotently.
    ///
    /// Self-follow is a silent no-op. A duplicate-key conflict means a
    /// concurrent request already created the edge; the outcome the caller
    /// asked for holds either way, so it is success.
    pub async fn follow(&self, viewer: Viewer, author_username: &str) -> Result<(), SocialError> {
        let user_id = viewer.user_id().ok_or(SocialError::Unauthorized)?;
        let author = self
            .users
            .find_by_username(author_username)
            .await?
            .ok_or(SocialError::AuthorNotFound)?;

        if author.id == user_id {
            debug!(user = %user_id, "ignoring self-follow");
            return Ok(());
        }

        match self
            .follows
            .insert_edge(FollowRecord {
                user_id,
                author_id: author.id,
            })
            .await
        {
            Ok(()) => Ok(()),
            Err(RepoError::Duplicate { constraint }) => {
                debug!(user = %user_id, author = %author.id, %constraint, "follow edge already present");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remove the follow edge. A missing edge, including an edge to an
    /// author that no longer exists, is not an error.
    pub async fn unfollow(&self, viewer: Viewer, author_username: &str) -> Result<(), SocialError> {
        let user_id = viewer.user_id().ok_or(SocialError::Unauthorized)?;
        let Some(author) = self.users.find_by_username(author_username).await? else {
            return Ok(());
        };

        let removed = self.follows.delete_edge(user_id, author.id).await?;
        if !removed {
            debug!(user = %user_id, author = %author.id, "unfollow without existing edge");
        }
        Ok(())
    }

    /// Author ids the viewer follows, feeding the personal feed filter.
    pub async fn authors_followed_by(&self, viewer: Viewer) -> Result<Vec<Uuid>, SocialError> {
        let user_id = viewer.user_id().ok_or(SocialError::Unauthorized)?;
        Ok(self.follows.authors_followed_by(user_id).await?)
    }
}
