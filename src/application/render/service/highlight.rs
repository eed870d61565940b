use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::application::render::types::RenderError;

pub(crate) const DEFAULT_LANGUAGE: &str = "plaintext";

/// Wrap `code` in the `div.code.{lang}` container, highlighting when a syntax set is given.
pub(crate) fn render_code_block(
    language: Option<&str>,
    code: &str,
    highlighter: Option<(&SyntaxSet, &ClassStyle)>,
) -> Result<String, RenderError> {
    let language = language
        .map(sanitize_language)
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let body = match highlighter {
        Some((syntax_set, class_style)) => {
            highlight(&language, code, syntax_set, class_style)?
        }
        None => escape_html(code),
    };

    Ok(format!(
        "<div class=\"code {language}\"><pre><code>{body}</code></pre></div>"
    ))
}

fn highlight(
    language: &str,
    code: &str,
    syntax_set: &SyntaxSet,
    class_style: &ClassStyle,
) -> Result<String, RenderError> {
    let syntax =
        find_syntax(syntax_set, language).unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let mut code_with_newline = code.to_string();
    if !code_with_newline.ends_with('\n') {
        code_with_newline.push('\n');
    }

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, *class_style);
    for line in LinesWithEndings::from(code_with_newline.as_str()) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|err| RenderError::Highlighting {
                language: language.to_string(),
                message: err.to_string(),
            })?;
    }

    Ok(generator.finalize())
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    syntax_set
        .find_syntax_by_token(token)
        .or_else(|| syntax_set.find_syntax_by_name(token))
        .or_else(|| syntax_set.find_syntax_by_extension(token))
}

/// Keep only characters that are safe inside a class attribute.
fn sanitize_language(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+' | '#' | '.'))
        .collect::<String>()
        .to_ascii_lowercase()
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_language_defaults_to_plaintext() {
        let html = render_code_block(None, "a < b", None).expect("render");
        assert_eq!(
            html,
            "<div class=\"code plaintext\"><pre><code>a &lt; b</code></pre></div>"
        );
    }

    #[test]
    fn language_is_reduced_to_class_safe_characters() {
        let html = render_code_block(Some("Rust\" onclick=x"), "fn main() {}", None)
            .expect("render");
        assert!(html.starts_with("<div class=\"code rustonclickx\">"));
    }

    #[test]
    fn highlighting_emits_prefixed_classes() {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let style = ClassStyle::SpacedPrefixed { prefix: "hl-" };
        let html = render_code_block(Some("rust"), "fn main() {}", Some((&syntax_set, &style)))
            .expect("render");

        assert!(html.starts_with("<div class=\"code rust\"><pre><code>"));
        assert!(html.contains("hl-"));
        assert!(html.ends_with("</code></pre></div>"));
    }
}
