//! Postgres-backed repository implementations.

mod comments;
mod follows;
mod groups;
mod posts;
mod types;
mod users;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::FeedScope;

/// Columns every feed listing selects: the post with author and group
/// prefetched in one joined query.
const FEED_POST_COLUMNS: &str = "p.id, p.text, p.image, p.created_at, \
     u.id AS author_id, u.username AS author_username, \
     g.id AS group_id, g.slug AS group_slug, g.title AS group_title";

const FEED_POST_JOINS: &str = " FROM posts p \
     INNER JOIN users u ON u.id = p.author_id \
     LEFT JOIN groups g ON g.id = p.group_id \
     WHERE 1=1 ";

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    fn apply_scope_conditions<'q>(qb: &mut QueryBuilder<'q, Postgres>, scope: &'q FeedScope) {
        match scope {
            FeedScope::Global => {}
            FeedScope::Group { group_id } => {
                qb.push(" AND p.group_id = ");
                qb.push_bind(group_id);
            }
            FeedScope::Author { author_id } => {
                qb.push(" AND p.author_id = ");
                qb.push_bind(author_id);
            }
            FeedScope::AuthoredByAnyOf { author_ids } => {
                // An empty author set matches nothing, which ANY over an
                // empty array already gives us.
                qb.push(" AND p.author_id = ANY(");
                qb.push_bind(author_ids.as_slice());
                qb.push(")");
            }
        }
    }
}
