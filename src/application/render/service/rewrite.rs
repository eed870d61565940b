use comrak::{
    Options,
    format_html,
    nodes::{AstNode, NodeHtmlBlock, NodeValue},
};
use syntect::{html::ClassStyle, parsing::SyntaxSet};

use crate::application::render::types::RenderError;

use super::highlight;

/// Replace block-quote paragraphs and fenced code with their custom HTML forms.
pub(crate) fn rewrite_ast<'a>(
    root: &'a AstNode<'a>,
    options: &Options<'static>,
    highlighter: Option<(&SyntaxSet, &ClassStyle)>,
) -> Result<(), RenderError> {
    let walker = RewriteWalker {
        options,
        highlighter,
    };
    walker.visit(root)
}

struct RewriteWalker<'r> {
    options: &'r Options<'static>,
    highlighter: Option<(&'r SyntaxSet, &'r ClassStyle)>,
}

impl RewriteWalker<'_> {
    fn visit<'a>(&self, node: &'a AstNode<'a>) -> Result<(), RenderError> {
        if is_quoted_paragraph(node) {
            return self.emphasize_paragraph(node);
        }

        if let Some((info, literal)) = extract_code_block(node) {
            let language = info.split_whitespace().next();
            let html = highlight::render_code_block(language, &literal, self.highlighter)?;
            replace_with_html(node, html);
            return Ok(());
        }

        let mut child = node.first_child();
        while let Some(next) = child {
            self.visit(next)?;
            child = next.next_sibling();
        }
        Ok(())
    }

    /// `<p>inline</p>` becomes `<p><em>inline</em></p>`.
    fn emphasize_paragraph<'a>(&self, node: &'a AstNode<'a>) -> Result<(), RenderError> {
        let mut rendered = String::new();
        format_html(node, self.options, &mut rendered).map_err(|err| RenderError::Markdown {
            message: err.to_string(),
        })?;

        let trimmed = rendered.trim_end();
        let inner = trimmed
            .strip_prefix("<p>")
            .and_then(|rest| rest.strip_suffix("</p>"))
            .unwrap_or(trimmed);

        while let Some(child) = node.first_child() {
            child.detach();
        }
        replace_with_html(node, format!("<p><em>{inner}</em></p>\n"));
        Ok(())
    }
}

fn is_quoted_paragraph<'a>(node: &'a AstNode<'a>) -> bool {
    let is_paragraph = matches!(node.data.borrow().value, NodeValue::Paragraph);
    is_paragraph
        && node
            .parent()
            .is_some_and(|parent| matches!(parent.data.borrow().value, NodeValue::BlockQuote))
}

fn extract_code_block(node: &AstNode<'_>) -> Option<(String, String)> {
    let data = node.data.borrow();
    if let NodeValue::CodeBlock(block) = &data.value {
        Some((block.info.trim().to_string(), block.literal.clone()))
    } else {
        None
    }
}

fn replace_with_html(node: &AstNode<'_>, literal: String) {
    let mut data = node.data.borrow_mut();
    data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal,
    });
}
