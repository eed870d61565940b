use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{PostsWriteRepo, RepoError, SavePostParams};
use crate::domain::blocks::Block;
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::PostRow;

const RETURNING_COLUMNS: &str =
    "RETURNING id, title, blocks, content, is_draft, tags, created_at, updated_at, deleted_at";

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_draft(&self, title: &str) -> Result<PostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "INSERT INTO posts (id, title, blocks, content, is_draft, tags, created_at, updated_at) \
             VALUES ($1, $2, $3, '', TRUE, $4, $5, $5) {RETURNING_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(Json(Vec::<Block>::new()))
            .bind(Json(Vec::<String>::new()))
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn save_post(&self, params: SavePostParams) -> Result<PostRecord, RepoError> {
        let SavePostParams {
            id,
            title,
            blocks,
            content,
            is_draft,
            tags,
        } = params;

        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "INSERT INTO posts (id, title, blocks, content, is_draft, tags, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
             ON CONFLICT (id) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 blocks = EXCLUDED.blocks, \
                 content = EXCLUDED.content, \
                 is_draft = EXCLUDED.is_draft, \
                 tags = EXCLUDED.tags, \
                 updated_at = EXCLUDED.updated_at \
             WHERE posts.deleted_at IS NULL \
             {RETURNING_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(title)
            .bind(Json(blocks))
            .bind(content)
            .bind(is_draft)
            .bind(Json(tags))
            .bind(now)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE posts SET deleted_at = $2, updated_at = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(OffsetDateTime::now_utc())
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
