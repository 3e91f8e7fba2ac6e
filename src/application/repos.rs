//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{
    CommentRecord, FeedPostRecord, FollowRecord, GroupRecord, UserRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Which posts a listing selects. The personalized variant carries the
/// resolved author set so the repository never consults the social graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    Global,
    Group { group_id: Uuid },
    Author { author_id: Uuid },
    AuthoredByAnyOf { author_ids: Vec<Uuid> },
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: String,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait GroupsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<GroupRecord>, RepoError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Count the posts a scope selects, for pagination windows.
    async fn count_posts(&self, scope: &FeedScope) -> Result<u64, RepoError>;

    /// List one window of a scope, author/group prefetched, ordered by
    /// creation time descending with id descending as the tie-break.
    async fn list_posts(
        &self,
        scope: &FeedScope,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<FeedPostRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<FeedPostRecord>, RepoError>;

    async fn create_post(&self, params: CreatePostParams) -> Result<FeedPostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<FeedPostRecord, RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    /// Comments for one post, newest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, RepoError>;

    async fn create_comment(&self, params: CreateCommentParams)
    -> Result<CommentRecord, RepoError>;
}

#[async_trait]
pub trait FollowsRepo: Send + Sync {
    async fn edge_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Insert the edge. A concurrent duplicate insert surfaces as
    /// `RepoError::Duplicate`; callers decide whether that is an error.
    async fn insert_edge(&self, edge: FollowRecord) -> Result<(), RepoError>;

    /// Delete the edge if present; returns whether a row was removed.
    async fn delete_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    async fn authors_followed_by(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}
