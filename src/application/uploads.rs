//! Editor image uploads: data-URL decoding and storage key naming.

use std::path::Path;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use metrics::counter;
use slug::slugify;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infra::telemetry::UPLOAD_STORED_TOTAL;
use crate::infra::uploads::{UploadStorage, UploadStorageError};

const IMAGE_PREFIX: &str = "images";
const FALLBACK_STEM: &str = "image";
const FALLBACK_EXTENSION: &str = "png";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] UploadStorageError),
}

/// An image as posted by the editor's uploader.
#[derive(Debug, Clone)]
pub struct UploadImageCommand {
    /// A `data:image/...;base64,` URL or bare base64.
    pub image: String,
    pub name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<UploadStorage>,
    public_base_url: String,
}

impl UploadService {
    pub fn new(storage: Arc<UploadStorage>, public_base_url: impl Into<String>) -> Self {
        Self {
            storage,
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn store_image(&self, command: UploadImageCommand) -> Result<StoredImage, UploadError> {
        let payload = decode_image_payload(&command.image)?;
        let key = build_image_key(&command.name, &command.content_type, Uuid::new_v4());

        self.storage.store(&key, payload).await?;

        counter!(UPLOAD_STORED_TOTAL).increment(1);
        info!(
            target = "blockflare::application::uploads",
            key = %key,
            "Stored uploaded image"
        );

        Ok(StoredImage {
            url: format!("{}/{key}", self.public_base_url),
            key,
        })
    }
}

/// Strip an optional `data:image/*;base64,` prefix and decode the remainder.
pub fn decode_image_payload(raw: &str) -> Result<Bytes, DomainError> {
    let raw = raw.trim();
    let encoded = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (media, data) = rest
                .split_once(";base64,")
                .ok_or_else(|| DomainError::validation("image must be a base64 data URL"))?;
            if !is_image_media_type(media) {
                return Err(DomainError::validation(format!(
                    "unsupported media type `{media}`"
                )));
            }
            data
        }
        None => raw,
    };

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|err| DomainError::validation(format!("invalid base64 image: {err}")))?;
    if decoded.is_empty() {
        return Err(DomainError::validation("image payload is empty"));
    }
    Ok(Bytes::from(decoded))
}

fn is_image_media_type(media: &str) -> bool {
    media.strip_prefix("image/").is_some_and(|subtype| {
        !subtype.is_empty()
            && subtype
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    })
}

/// `images/{stem}_{uuid}.{ext}`; the extension comes from the file name, then the MIME type.
pub fn build_image_key(name: &str, content_type: &str, id: Uuid) -> String {
    let path = Path::new(name);
    let mut stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .map(slugify)
        .unwrap_or_default();
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .filter(|value| is_safe_extension(value))
        .or_else(|| {
            content_type
                .trim()
                .strip_prefix("image/")
                .map(|subtype| subtype.to_ascii_lowercase())
                .filter(|value| is_safe_extension(value))
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!("{IMAGE_PREFIX}/{stem}_{id}.{extension}")
}

fn is_safe_extension(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphanumeric())
}
