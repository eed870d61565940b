//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::blocks::Block;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub blocks: Vec<Block>,
    /// Markdown derived from `blocks` on every save.
    pub content: String,
    pub is_draft: bool,
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl PostRecord {
    /// Whether a reader with the given session state may see this post.
    pub fn is_visible_to(&self, authenticated: bool) -> bool {
        self.deleted_at.is_none() && (authenticated || !self.is_draft)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub id: i64,
    pub name: String,
    pub value: String,
}

/// Site branding assembled from metadata rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteMetadata {
    pub blog_name: String,
    pub blog_desc: String,
    pub blog_avatar: String,
}

impl SiteMetadata {
    pub const BLOG_NAME: &'static str = "blog_name";
    pub const BLOG_DESC: &'static str = "blog_desc";
    pub const BLOG_AVATAR: &'static str = "blog_avatar";

    /// Fold metadata rows into branding fields; unknown names are ignored.
    pub fn from_records(records: impl IntoIterator<Item = MetadataRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut site, record| {
                match record.name.as_str() {
                    Self::BLOG_NAME => site.blog_name = record.value,
                    Self::BLOG_DESC => site.blog_desc = record.value,
                    Self::BLOG_AVATAR => site.blog_avatar = record.value,
                    _ => {}
                }
                site
            })
    }
}
