//! Reader-facing listing and detail pages.

use std::sync::Arc;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::render::{MarkdownRenderer, RenderError};
use crate::application::repos::{PostListScope, PostsRepo, RepoError};
use crate::domain::content::excerpt_source;
use crate::domain::entities::PostRecord;
use crate::domain::excerpt::{LISTING_EXCERPT_CHARS, truncate};
use crate::presentation::views::{PageContext, PostCard, PostDetailContext};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    renderer: Arc<MarkdownRenderer>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, renderer: Arc<MarkdownRenderer>) -> Self {
        Self { posts, renderer }
    }

    /// One listing page. Drafts are included only for authenticated sessions.
    pub async fn page_context(
        &self,
        request: PageRequest,
        authenticated: bool,
    ) -> Result<PageContext, FeedError> {
        let records = self
            .posts
            .list_posts(PostListScope::for_session(authenticated), request)
            .await?;

        let mut posts = Vec::with_capacity(records.len());
        for record in &records {
            posts.push(self.record_to_card(record)?);
        }

        Ok(PageContext {
            next_page: request.next_after(posts.len()),
            posts,
        })
    }

    /// Detail view, or `None` when the post is missing, deleted or hidden from this reader.
    pub async fn post_detail(
        &self,
        id: Uuid,
        authenticated: bool,
    ) -> Result<Option<PostDetailContext>, FeedError> {
        let Some(record) = self.posts.find_by_id(id).await? else {
            return Ok(None);
        };
        if !record.is_visible_to(authenticated) {
            return Ok(None);
        }

        let content_html = self.renderer.render(&record.content)?;

        Ok(Some(PostDetailContext {
            id: record.id.to_string(),
            published: format_human_date(record.created_at),
            iso_date: record.created_at.format(&Rfc3339).unwrap_or_default(),
            title: record.title,
            content_html,
            is_draft: record.is_draft,
        }))
    }

    fn record_to_card(&self, record: &PostRecord) -> Result<PostCard, FeedError> {
        let excerpt = truncate(&excerpt_source(&record.blocks), LISTING_EXCERPT_CHARS);
        Ok(PostCard {
            id: record.id.to_string(),
            title: record.title.clone(),
            excerpt_html: self.renderer.render(&excerpt)?,
            is_draft: record.is_draft,
        })
    }
}

/// `7 Mar 2024` style date shown under post titles.
pub fn format_human_date(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[day padding:none] [month repr:short] [year]"
    ))
    .unwrap_or_default()
}
