//! Post authoring and comments.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CommentsRepo, CreateCommentParams, CreatePostParams, GroupsRepo, PostsRepo, RepoError,
    UpdatePostParams,
};
use crate::domain::entities::{CommentRecord, FeedPostRecord};
use crate::domain::identity::Viewer;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found")]
    NotFound,
    #[error("unknown group")]
    UnknownGroup,
    #[error("operation requires an authenticated identity")]
    Unauthorized,
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl PostError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// A single post with its comment thread, newest comments first.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: FeedPostRecord,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub group_slug: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_slug: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
    groups: Arc<dyn GroupsRepo>,
    comments: Arc<dyn CommentsRepo>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        groups: Arc<dyn GroupsRepo>,
        comments: Arc<dyn CommentsRepo>,
    ) -> Self {
        Self {
            posts,
            groups,
            comments,
        }
    }

    pub async fn post_detail(&self, id: i64) -> Result<PostDetail, PostError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound)?;
        let comments = self.comments.list_for_post(post.id).await?;
        Ok(PostDetail { post, comments })
    }

    pub async fn create_post(
        &self,
        viewer: Viewer,
        draft: NewPost,
    ) -> Result<FeedPostRecord, PostError> {
        let author_id = viewer.user_id().ok_or(PostError::Unauthorized)?;
        let text = require_text(&draft.text)?;
        let group_id = self.resolve_group(draft.group_slug.as_deref()).await?;

        let created = self
            .posts
            .create_post(CreatePostParams {
                author_id,
                text,
                group_id,
                image: draft.image,
            })
            .await?;
        info!(post = created.id, author = %author_id, "post created");
        Ok(created)
    }

    /// Apply edits to an existing post. Only the author may edit; anyone
    /// else gets the same not-found outcome as a missing post, so
    /// existence is not leaked.
    pub async fn edit_post(
        &self,
        viewer: Viewer,
        id: i64,
        changes: PostChanges,
    ) -> Result<FeedPostRecord, PostError> {
        let editor = viewer.user_id().ok_or(PostError::Unauthorized)?;
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound)?;
        if post.author.id != editor {
            return Err(PostError::NotFound);
        }

        let text = require_text(&changes.text)?;
        let group_id = self.resolve_group(changes.group_slug.as_deref()).await?;

        let updated = self
            .posts
            .update_post(UpdatePostParams {
                id,
                text,
                group_id,
                image: changes.image,
            })
            .await?;
        Ok(updated)
    }

    pub async fn add_comment(
        &self,
        viewer: Viewer,
        post_id: i64,
        text: &str,
    ) -> Result<CommentRecord, PostError> {
        let author_id = viewer.user_id().ok_or(PostError::Unauthorized)?;
        let text = require_text(text)?;
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::NotFound)?;

        let comment = self
            .comments
            .create_comment(CreateCommentParams {
                post_id: post.id,
                author_id,
                text,
            })
            .await?;
        Ok(comment)
    }

    async fn resolve_group(&self, slug: Option<&str>) -> Result<Option<uuid::Uuid>, PostError> {
        match slug {
            None => Ok(None),
            Some(slug) => {
                let group = self
                    .groups
                    .find_by_slug(slug)
                    .await?
                    .ok_or(PostError::UnknownGroup)?;
                Ok(Some(group.id))
            }
        }
    }
}

fn require_text(text: &str) -> Result<String, PostError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PostError::validation("text must not be empty"));
    }
    Ok(trimmed.to_string())
}
