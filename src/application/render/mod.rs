//! Markdown rendering for post bodies, excerpts and the site description.
//!
//! The pipeline is pure: Markdown in, sanitised HTML out. A single
//! [`MarkdownRenderer`] is built at startup from a [`RenderConfig`] and shared
//! through application state.

mod service;
mod types;

pub use service::MarkdownRenderer;
pub use types::{RenderConfig, RenderError};
