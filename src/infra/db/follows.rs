use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{FollowsRepo, RepoError};
use crate::domain::entities::FollowRecord;

use super::PostgresRepositories;
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl FollowsRepo for PostgresRepositories {
    async fn edge_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn insert_edge(&self, edge: FollowRecord) -> Result<(), RepoError> {
        // The unique constraint on (user_id, author_id) is the arbiter
        // under concurrent duplicate requests; callers map Duplicate to
        // success.
        sqlx::query("INSERT INTO follows (user_id, author_id) VALUES ($1, $2)")
            .bind(edge.user_id)
            .bind(edge.author_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn authors_followed_by(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM follows WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(ids)
    }
}
