//! Feed assembly: one ordered, paginated post sequence per scope.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::application::pagination::{Page, PageWindow};
use crate::application::repos::{FeedScope, GroupsRepo, PostsRepo, RepoError, UsersRepo};
use crate::application::social::{SocialError, SocialGraphService};
use crate::cache::{FeedCache, FeedCacheKey};
use crate::domain::entities::{FeedPostRecord, GroupRecord, UserRecord};
use crate::domain::identity::Viewer;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown group")]
    UnknownGroup,
    #[error("unknown author")]
    UnknownAuthor,
    #[error("feed requires an authenticated identity")]
    Unauthorized,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SocialError> for FeedError {
    fn from(error: SocialError) -> Self {
        match error {
            SocialError::AuthorNotFound => FeedError::UnknownAuthor,
            SocialError::Unauthorized => FeedError::Unauthorized,
            SocialError::Repo(err) => FeedError::Repo(err),
        }
    }
}

/// A group timeline together with the group it belongs to.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: GroupRecord,
    pub page: Page<FeedPostRecord>,
}

/// An author timeline plus whether the viewer follows that author.
#[derive(Debug, Clone)]
pub struct AuthorFeed {
    pub author: UserRecord,
    pub following: bool,
    pub page: Page<FeedPostRecord>,
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    groups: Arc<dyn GroupsRepo>,
    users: Arc<dyn UsersRepo>,
    social: SocialGraphService,
    cache: Arc<FeedCache>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        groups: Arc<dyn GroupsRepo>,
        users: Arc<dyn UsersRepo>,
        social: SocialGraphService,
        cache: Arc<FeedCache>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            social,
            cache,
        }
    }

    /// The global timeline: every post, newest first.
    ///
    /// The only cached scope. The page is identical for every viewer, so
    /// the cache key is the scope plus the clamped page number; staleness
    /// is bounded by the cache TTL, not by write activity.
    pub async fn global_timeline(&self, page: u32) -> Result<Page<FeedPostRecord>, FeedError> {
        if let Some(cached) = self.cache.get(&FeedCacheKey::global(page)) {
            return Ok(cached);
        }

        let assembled = self.assemble(&FeedScope::Global, page).await?;
        // Key by the clamped page number, not the requested one: a scan
        // over arbitrary page numbers must not mint one entry per number
        // for the same body.
        self.cache
            .insert(FeedCacheKey::global(assembled.number), assembled.clone());
        Ok(assembled)
    }

    /// Posts assigned to the group with `slug`. An unknown slug is a
    /// not-found outcome; a known group with no posts is an empty page.
    pub async fn group_timeline(&self, slug: &str, page: u32) -> Result<GroupFeed, FeedError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or(FeedError::UnknownGroup)?;

        let scope = FeedScope::Group { group_id: group.id };
        let page = self.assemble(&scope, page).await?;
        Ok(GroupFeed { group, page })
    }

    /// Posts authored by `username`, plus the viewer's follow state for
    /// profile display. Anonymous viewers are fine here; they just never
    /// follow anyone.
    pub async fn author_timeline(
        &self,
        username: &str,
        viewer: Viewer,
        page: u32,
    ) -> Result<AuthorFeed, FeedError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(FeedError::UnknownAuthor)?;

        let following = self.social.is_following(viewer, author.id).await?;
        let scope = FeedScope::Author {
            author_id: author.id,
        };
        let page = self.assemble(&scope, page).await?;
        Ok(AuthorFeed {
            author,
            following,
            page,
        })
    }

    /// Posts by every author the viewer follows. Requires an
    /// authenticated identity.
    pub async fn personal_timeline(
        &self,
        viewer: Viewer,
        page: u32,
    ) -> Result<Page<FeedPostRecord>, FeedError> {
        let author_ids = self.social.authors_followed_by(viewer).await?;
        if author_ids.is_empty() {
            debug!("personal timeline for viewer following nobody");
        }
        let scope = FeedScope::AuthoredByAnyOf { author_ids };
        self.assemble(&scope, page).await
    }

    /// Count, clamp, fetch: the shared tail of every scope.
    async fn assemble(
        &self,
        scope: &FeedScope,
        requested: u32,
    ) -> Result<Page<FeedPostRecord>, FeedError> {
        let total = self.posts.count_posts(scope).await?;
        let window = PageWindow::clamped(total, requested);
        let items = self
            .posts
            .list_posts(scope, window.offset, window.limit)
            .await?;
        Ok(Page::assemble(items, window))
    }
}
