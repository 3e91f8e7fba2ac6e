use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::application::repos::{
    CreatePostParams, FeedScope, PostsRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::FeedPostRecord;

use super::types::FeedPostRow;
use super::{FEED_POST_COLUMNS, FEED_POST_JOINS, PostgresRepositories};
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn count_posts(&self, scope: &FeedScope) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p WHERE 1=1 ");
        Self::apply_scope_conditions(&mut qb, scope);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        count
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    async fn list_posts(
        &self,
        scope: &FeedScope,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<FeedPostRecord>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(FEED_POST_COLUMNS);
        qb.push(FEED_POST_JOINS);
        Self::apply_scope_conditions(&mut qb, scope);

        // Timestamps can collide within a second; id keeps the order total.
        qb.push(" ORDER BY p.created_at DESC, p.id DESC ");
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_as::<FeedPostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FeedPostRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FeedPostRecord>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(FEED_POST_COLUMNS);
        qb.push(FEED_POST_JOINS);
        qb.push(" AND p.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<FeedPostRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FeedPostRecord::from))
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<FeedPostRecord, RepoError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (text, author_id, group_id, image) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&params.text)
        .bind(params.author_id)
        .bind(params.group_id)
        .bind(&params.image)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::from_persistence("inserted post row vanished"))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<FeedPostRecord, RepoError> {
        let result = sqlx::query(
            "UPDATE posts SET text = $2, group_id = $3, image = $4 WHERE id = $1",
        )
        .bind(params.id)
        .bind(&params.text)
        .bind(params.group_id)
        .bind(&params.image)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.find_by_id(params.id)
            .await?
            .ok_or(RepoError::NotFound)
    }
}
