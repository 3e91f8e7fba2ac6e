//! In-memory repository fakes and fixture builders shared by the
//! integration tests. The fakes honor the same ordering contract as the
//! Postgres adapters: newest first, id descending as the tie-break.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use tribuna::application::feeds::FeedService;
use tribuna::application::posts::PostService;
use tribuna::application::repos::{
    CommentsRepo, CreateCommentParams, CreatePostParams, FeedScope, FollowsRepo, GroupsRepo,
    PostsRepo, RepoError, UpdatePostParams, UsersRepo,
};
use tribuna::application::social::SocialGraphService;
use tribuna::cache::{CacheConfig, FeedCache};
use tribuna::domain::entities::{
    AuthorRef, CommentRecord, FeedPostRecord, FollowRecord, GroupRecord, GroupRef, UserRecord,
};

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    groups: Vec<GroupRecord>,
    posts: Vec<FeedPostRecord>,
    comments: Vec<CommentRecord>,
    follows: HashSet<(Uuid, Uuid)>,
    next_post_id: i64,
    next_comment_id: i64,
    ticks: i64,
}

impl Inner {
    fn next_timestamp(&mut self) -> OffsetDateTime {
        self.ticks += 1;
        OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(self.ticks)
    }

    fn author_ref(&self, author_id: Uuid) -> Option<AuthorRef> {
        self.users.iter().find(|u| u.id == author_id).map(|u| AuthorRef {
            id: u.id,
            username: u.username.clone(),
        })
    }

    fn group_ref(&self, group_id: Uuid) -> Option<GroupRef> {
        self.groups.iter().find(|g| g.id == group_id).map(|g| GroupRef {
            id: g.id,
            slug: g.slug.clone(),
            title: g.title.clone(),
        })
    }
}

/// One shared store implementing every repository trait.
#[derive(Default)]
pub struct MemoryRepos {
    inner: Mutex<Inner>,
}

impl MemoryRepos {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, username: &str) -> UserRecord {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_timestamp();
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at,
        };
        inner.users.push(user.clone());
        user
    }

    pub fn add_group(&self, slug: &str, title: &str) -> GroupRecord {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_timestamp();
        let group = GroupRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            created_at,
        };
        inner.groups.push(group.clone());
        group
    }

    pub fn add_post(
        &self,
        author: &UserRecord,
        group: Option<&GroupRecord>,
        text: &str,
    ) -> FeedPostRecord {
        let mut inner = self.inner.lock().unwrap();
        inner.next_post_id += 1;
        let id = inner.next_post_id;
        let created_at = inner.next_timestamp();
        let post = FeedPostRecord {
            id,
            text: text.to_string(),
            author: AuthorRef {
                id: author.id,
                username: author.username.clone(),
            },
            group: group.map(|g| GroupRef {
                id: g.id,
                slug: g.slug.clone(),
                title: g.title.clone(),
            }),
            image: None,
            created_at,
        };
        inner.posts.push(post.clone());
        post
    }

    fn matches(post: &FeedPostRecord, scope: &FeedScope) -> bool {
        match scope {
            FeedScope::Global => true,
            FeedScope::Group { group_id } => {
                post.group.as_ref().is_some_and(|g| g.id == *group_id)
            }
            FeedScope::Author { author_id } => post.author.id == *author_id,
            FeedScope::AuthoredByAnyOf { author_ids } => author_ids.contains(&post.author.id),
        }
    }

    fn selected(inner: &Inner, scope: &FeedScope) -> Vec<FeedPostRecord> {
        let mut posts: Vec<FeedPostRecord> = inner
            .posts
            .iter()
            .filter(|p| Self::matches(p, scope))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }
}

#[async_trait]
impl UsersRepo for MemoryRepos {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl GroupsRepo for MemoryRepos {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<GroupRecord>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.groups.iter().find(|g| g.slug == slug).cloned())
    }
}

#[async_trait]
impl PostsRepo for MemoryRepos {
    async fn count_posts(&self, scope: &FeedScope) -> Result<u64, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::selected(&inner, scope).len() as u64)
    }

    async fn list_posts(
        &self,
        scope: &FeedScope,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<FeedPostRecord>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::selected(&inner, scope)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FeedPostRecord>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<FeedPostRecord, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let author = inner
            .author_ref(params.author_id)
            .ok_or(RepoError::InvalidInput {
                message: "unknown author".to_string(),
            })?;
        let group = params.group_id.and_then(|id| inner.group_ref(id));
        inner.next_post_id += 1;
        let id = inner.next_post_id;
        let created_at = inner.next_timestamp();
        let post = FeedPostRecord {
            id,
            text: params.text,
            author,
            group,
            image: params.image,
            created_at,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<FeedPostRecord, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let group = params.group_id.and_then(|id| inner.group_ref(id));
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.text = params.text;
        post.group = group;
        post.image = params.image;
        Ok(post.clone())
    }
}

#[async_trait]
impl CommentsRepo for MemoryRepos {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, RepoError> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<CommentRecord> = inner
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(comments)
    }

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        let author = inner
            .author_ref(params.author_id)
            .ok_or(RepoError::InvalidInput {
                message: "unknown author".to_string(),
            })?;
        inner.next_comment_id += 1;
        let id = inner.next_comment_id;
        let created_at = inner.next_timestamp();
        let comment = CommentRecord {
            id,
            post_id: params.post_id,
            author,
            text: params.text,
            created_at,
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl FollowsRepo for MemoryRepos {
    async fn edge_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.follows.contains(&(user_id, author_id)))
    }

    async fn insert_edge(&self, edge: FollowRecord) -> Result<(), RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.follows.insert((edge.user_id, edge.author_id)) {
            return Err(RepoError::Duplicate {
                constraint: "follows_unique_edge".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.follows.remove(&(user_id, author_id)))
    }

    async fn authors_followed_by(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .follows
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, a)| *a)
            .collect())
    }
}

pub fn social_service(repos: &Arc<MemoryRepos>) -> SocialGraphService {
    SocialGraphService::new(repos.clone(), repos.clone())
}

pub fn feed_service(repos: &Arc<MemoryRepos>, ttl: Duration) -> FeedService {
    FeedService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        social_service(repos),
        Arc::new(FeedCache::new(CacheConfig::with_ttl(ttl))),
    )
}

pub fn post_service(repos: &Arc<MemoryRepos>) -> PostService {
    PostService::new(repos.clone(), repos.clone(), repos.clone())
}
