//! Row types bridging Postgres result sets and domain records.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    AuthorRef, CommentRecord, FeedPostRecord, GroupRecord, GroupRef, UserRecord,
};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub created_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct GroupRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

impl From<GroupRow> for GroupRecord {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// One joined feed row: the post plus its author and (optional) group.
#[derive(Debug, FromRow)]
pub struct FeedPostRow {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<Uuid>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

impl From<FeedPostRow> for FeedPostRecord {
    fn from(row: FeedPostRow) -> Self {
        let group = match (row.group_id, row.group_slug, row.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(GroupRef { id, slug, title }),
            _ => None,
        };
        Self {
            id: row.id,
            text: row.text,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            group,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub author_id: Uuid,
    pub author_username: String,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            text: row.text,
            created_at: row.created_at,
        }
    }
}
