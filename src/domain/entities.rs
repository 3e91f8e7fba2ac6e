//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// Author context carried alongside a feed post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

/// Group context carried alongside a feed post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

/// A post with its author and group prefetched, as every listing returns it.
///
/// Listings never go back to storage per row; the joined projection is the
/// unit the feed assembler, the cache, and the API all work with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPostRecord {
    pub id: i64,
    pub text: String,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub id: i64,
    pub post_id: i64,
    pub author: AuthorRef,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// A follow edge: `user` receives `author`'s posts in their personal feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowRecord {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
