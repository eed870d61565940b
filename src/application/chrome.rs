use std::sync::Arc;

use axum::http::StatusCode;

use crate::application::auth::Session;
use crate::application::error::HttpError;
use crate::application::render::MarkdownRenderer;
use crate::application::repos::{MetadataRepo, RepoError};
use crate::domain::entities::SiteMetadata;
use crate::presentation::views::LayoutChrome;

const SOURCE: &str = "application::chrome::ChromeService";

/// Loads the site branding every page shares.
#[derive(Clone)]
pub struct ChromeService {
    metadata: Arc<dyn MetadataRepo>,
    renderer: Arc<MarkdownRenderer>,
}

impl ChromeService {
    pub fn new(metadata: Arc<dyn MetadataRepo>, renderer: Arc<MarkdownRenderer>) -> Self {
        Self { metadata, renderer }
    }

    pub async fn load(&self, session: Session) -> Result<LayoutChrome, HttpError> {
        let records = self
            .metadata
            .list_metadata()
            .await
            .map_err(|err| repo_failure("list_metadata", err))?;
        let site = SiteMetadata::from_records(records);

        let blog_desc_html = self.renderer.render(&site.blog_desc)?;

        Ok(LayoutChrome {
            blog_name: site.blog_name,
            blog_avatar: site.blog_avatar,
            blog_desc: site.blog_desc,
            blog_desc_html,
            authenticated: session.authenticated,
        })
    }
}

fn repo_failure(operation: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load site chrome",
        format!("{operation} failed: {err}"),
    )
}
