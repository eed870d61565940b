mod config;
mod highlight;
mod rewrite;

use comrak::{Arena, format_html, parse_document};
use syntect::{html::ClassStyle, parsing::SyntaxSet};

use crate::application::render::types::{RenderConfig, RenderError};

use config::{build_sanitizer, default_options};
use rewrite::rewrite_ast;

const HIGHLIGHT_CLASS_PREFIX: &str = "hl-";

/// Comrak-based Markdown renderer with syntect highlighting and ammonia sanitisation.
pub struct MarkdownRenderer {
    options: comrak::Options<'static>,
    syntax_set: Option<SyntaxSet>,
    class_style: ClassStyle,
    sanitizer: ammonia::Builder<'static>,
}

impl MarkdownRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let syntax_set = config
            .highlight_code
            .then(SyntaxSet::load_defaults_newlines);

        Self {
            options: default_options(),
            syntax_set,
            class_style: ClassStyle::SpacedPrefixed {
                prefix: HIGHLIGHT_CLASS_PREFIX,
            },
            sanitizer: build_sanitizer(),
        }
    }

    /// Render Markdown to sanitised HTML.
    ///
    /// Paragraphs directly inside a block quote are emphasised and fenced code
    /// is wrapped in `<div class="code {lang}">`.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &self.options);

        let highlighter = self
            .syntax_set
            .as_ref()
            .map(|syntax_set| (syntax_set, &self.class_style));
        rewrite_ast(root, &self.options, highlighter)?;

        let mut html = String::new();
        format_html(root, &self.options, &mut html).map_err(|err| RenderError::Markdown {
            message: err.to_string(),
        })?;

        Ok(self.sanitizer.clean(&html).to_string())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(RenderConfig {
            highlight_code: false,
        })
    }

    #[test]
    fn blockquote_paragraphs_are_emphasised() {
        let html = plain_renderer().render("> quoted **words**\n").expect("render");
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("<p><em>quoted <strong>words</strong></em></p>"));
    }

    #[test]
    fn paragraphs_outside_quotes_are_untouched() {
        let html = plain_renderer().render("plain text\n").expect("render");
        assert_eq!(html.trim(), "<p>plain text</p>");
    }

    #[test]
    fn fenced_code_uses_code_container() {
        let html = plain_renderer()
            .render("```go\nfmt.Println()\n```\n")
            .expect("render");
        assert!(html.contains("<div class=\"code go\"><pre><code>fmt.Println()"));
    }

    #[test]
    fn fenced_code_without_language_is_plaintext() {
        let html = plain_renderer().render("```\nx\n```\n").expect("render");
        assert!(html.contains("<div class=\"code plaintext\">"));
    }

    #[test]
    fn highlighted_code_keeps_class_spans_after_sanitising() {
        let html = MarkdownRenderer::default()
            .render("```rust\nlet x = 1;\n```\n")
            .expect("render");
        assert!(html.contains("<div class=\"code rust\">"));
        assert!(html.contains("class=\"hl-"));
    }

    #[test]
    fn raw_scripts_are_removed() {
        let html = plain_renderer()
            .render("hello <script>alert(1)</script>\n")
            .expect("render");
        assert!(!html.contains("<script"));
    }

    #[test]
    fn checklists_render_disabled_checkboxes() {
        let html = plain_renderer().render("- [x] done\n").expect("render");
        assert!(html.contains("checked"));
    }
}
