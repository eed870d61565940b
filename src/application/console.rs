//! Authenticated post editing: draft creation, saves and soft deletes.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use metrics::counter;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{PostsRepo, PostsWriteRepo, RepoError, SavePostParams};
use crate::domain::blocks::Block;
use crate::domain::content::serialize;
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::infra::telemetry::{POST_DELETED_TOTAL, POST_SAVED_TOTAL};
use crate::presentation::views::EditorContext;

/// Title given to posts created from the console.
pub const NEW_POST_TITLE: &str = "New Post";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Editor submission as received from the console form.
#[derive(Debug, Clone, Default)]
pub struct SavePostCommand {
    pub id: Option<Uuid>,
    pub title: String,
    /// Each entry is one JSON-encoded editor block.
    pub blocks: Vec<String>,
    pub publish: bool,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct ConsoleService {
    posts: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl ConsoleService {
    pub fn new(posts: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self { posts, writer }
    }

    pub async fn create_draft(&self) -> Result<PostRecord, ConsoleError> {
        let record = self.writer.create_draft(NEW_POST_TITLE).await?;
        info!(
            target = "blockflare::application::console",
            post_id = %record.id,
            "Created draft post"
        );
        Ok(record)
    }

    pub async fn editor_context(&self, id: Uuid) -> Result<EditorContext, ConsoleError> {
        let record = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        Ok(EditorContext {
            id: record.id.to_string(),
            blocks_base64: encode_blocks(&record.blocks),
            title: record.title,
            is_draft: record.is_draft,
        })
    }

    /// Upsert a post from an editor submission, recomputing its Markdown content.
    pub async fn save(&self, command: SavePostCommand) -> Result<PostRecord, ConsoleError> {
        let blocks = parse_blocks(&command.blocks)?;
        let content = serialize(&blocks);
        let id = command.id.unwrap_or_else(Uuid::new_v4);

        let record = self
            .writer
            .save_post(SavePostParams {
                id,
                title: command.title.trim().to_string(),
                blocks,
                content,
                is_draft: !command.publish,
                tags: normalize_tags(command.tags),
            })
            .await?;

        counter!(POST_SAVED_TOTAL).increment(1);
        info!(
            target = "blockflare::application::console",
            post_id = %record.id,
            is_draft = record.is_draft,
            blocks = record.blocks.len(),
            "Saved post"
        );
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ConsoleError> {
        self.writer.delete_post(id).await?;
        counter!(POST_DELETED_TOTAL).increment(1);
        info!(
            target = "blockflare::application::console",
            post_id = %id,
            "Soft-deleted post"
        );
        Ok(())
    }
}

/// Decode the editor's per-block JSON strings, keeping their order.
pub fn parse_blocks(raw: &[String]) -> Result<Vec<Block>, DomainError> {
    raw.iter()
        .enumerate()
        .map(|(index, json)| {
            serde_json::from_str::<Block>(json)
                .map_err(|err| DomainError::malformed_block(index, err.to_string()))
        })
        .collect()
}

/// Base64 of the JSON block array handed back to the editor.
pub fn encode_blocks(blocks: &[Block]) -> String {
    let json = serde_json::to_vec(blocks).unwrap_or_else(|_| b"[]".to_vec());
    STANDARD.encode(json)
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}
