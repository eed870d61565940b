use thiserror::Error;

use crate::config::RenderSettings;

/// Options fixed for the lifetime of a [`super::MarkdownRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Emit syntect class spans inside fenced code; otherwise code is only escaped.
    pub highlight_code: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            highlight_code: true,
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            highlight_code: settings.highlight_code,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("markdown formatting failed: {message}")]
    Markdown { message: String },
    #[error("highlighting `{language}` failed: {message}")]
    Highlighting { language: String, message: String },
}
