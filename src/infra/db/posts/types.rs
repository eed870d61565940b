use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::blocks::Block;
use crate::domain::entities::PostRecord;

pub(crate) const POST_COLUMNS: &str = "p.id, p.title, p.blocks, p.content, p.is_draft, p.tags, \
     p.created_at, p.updated_at, p.deleted_at";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) blocks: Json<Vec<Block>>,
    pub(crate) content: String,
    pub(crate) is_draft: bool,
    pub(crate) tags: Json<Vec<String>>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
    pub(crate) deleted_at: Option<OffsetDateTime>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            blocks: row.blocks.0,
            content: row.content,
            is_draft: row.is_draft,
            tags: row.tags.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}
