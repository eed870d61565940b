use async_trait::async_trait;

use crate::application::repos::{MetadataRepo, RepoError};
use crate::domain::entities::MetadataRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct MetadataRow {
    id: i64,
    name: String,
    value: String,
}

impl From<MetadataRow> for MetadataRecord {
    fn from(row: MetadataRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            value: row.value,
        }
    }
}

#[async_trait]
impl MetadataRepo for PostgresRepositories {
    async fn list_metadata(&self) -> Result<Vec<MetadataRecord>, RepoError> {
        let rows = sqlx::query_as::<_, MetadataRow>(
            "SELECT id, name, value FROM metadata ORDER BY id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MetadataRecord::from).collect())
    }
}
