//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::domain::blocks::Block;
use crate::domain::entities::{MetadataRecord, PostRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Which posts a listing may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListScope {
    /// Published posts only.
    Public,
    /// Drafts included; used for authenticated sessions.
    Console,
}

impl PostListScope {
    pub fn for_session(authenticated: bool) -> Self {
        if authenticated {
            Self::Console
        } else {
            Self::Public
        }
    }
}

/// Whole-row replacement of a post. Inserts when `id` is unknown.
#[derive(Debug, Clone)]
pub struct SavePostParams {
    pub id: Uuid,
    pub title: String,
    pub blocks: Vec<Block>,
    pub content: String,
    pub is_draft: bool,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Newest `created_at` first, soft-deleted rows excluded.
    async fn list_posts(
        &self,
        scope: PostListScope,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError>;

    /// Soft-deleted rows are reported as absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_draft(&self, title: &str) -> Result<PostRecord, RepoError>;

    async fn save_post(&self, params: SavePostParams) -> Result<PostRecord, RepoError>;

    /// Returns [`RepoError::NotFound`] when no live post has `id`.
    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait MetadataRepo: Send + Sync {
    async fn list_metadata(&self) -> Result<Vec<MetadataRecord>, RepoError>;
}
