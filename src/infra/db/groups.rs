use async_trait::async_trait;

use crate::application::repos::{GroupsRepo, RepoError};
use crate::domain::entities::GroupRecord;

use super::PostgresRepositories;
use super::types::GroupRow;
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl GroupsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<GroupRecord>, RepoError> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT id, title, slug, description, created_at FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(GroupRecord::from))
    }
}
