//! Block-to-Markdown serialization.
//!
//! `serialize` produces the stored `content` text of a post. Every block renders
//! to a newline-terminated chunk and chunks are joined with a newline, so
//! consecutive blocks are separated by one blank line.

use crate::domain::blocks::{
    Block, BlockBody, ChecklistData, CodeData, HeaderData, ImageData, ListData, ListItem,
    ListStyle, QuoteData,
};

const DEFAULT_CODE_LANGUAGE: &str = "plain";
const INDENT: char = '\t';

/// Render an ordered block sequence into Markdown-flavoured text.
///
/// Unsupported blocks are skipped.
pub fn serialize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| render_block(&block.body))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain text used for listing previews: paragraph blocks only.
pub fn excerpt_source(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| match &block.body {
            BlockBody::Paragraph(data) => Some(data.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(body: &BlockBody) -> Option<String> {
    let rendered = match body {
        BlockBody::Paragraph(data) => terminated(&data.text),
        BlockBody::Header(data) => render_header(data),
        BlockBody::Quote(data) => render_quote(data),
        BlockBody::List(data) => render_list(data),
        BlockBody::Checklist(data) => render_checklist(data),
        BlockBody::Image(data) => render_image(data),
        BlockBody::Code(data) => render_code(data),
        BlockBody::Text(data) => terminated(&format!("`{}`", data.text)),
        BlockBody::Unsupported { .. } => return None,
    };
    Some(rendered)
}

fn terminated(line: &str) -> String {
    format!("{line}\n")
}

fn render_header(data: &HeaderData) -> String {
    let level = usize::from(data.level.clamp(1, 6));
    terminated(&format!("{} {}", "#".repeat(level), data.text))
}

fn render_quote(data: &QuoteData) -> String {
    terminated(&format!("> {}", data.text.trim()))
}

fn render_checklist(data: &ChecklistData) -> String {
    data.items
        .iter()
        .map(|item| {
            let mark = if item.checked { 'x' } else { ' ' };
            terminated(&format!("- [{mark}] {}", item.text))
        })
        .collect()
}

fn render_image(data: &ImageData) -> String {
    terminated(&format!("![{}]({})", data.caption, data.file.url))
}

fn render_code(data: &CodeData) -> String {
    let language = data
        .language
        .as_deref()
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(DEFAULT_CODE_LANGUAGE);
    format!("```{language}\n{}\n```\n", data.code)
}

fn render_list(data: &ListData) -> String {
    data.items
        .iter()
        .enumerate()
        .flat_map(|(position, item)| {
            let marker = match data.style {
                ListStyle::Unordered => ListMarker::Bullet,
                ListStyle::Ordered => ListMarker::Ordinal(position + 1),
            };
            render_list_item(item, 0, marker)
        })
        .map(|line| terminated(&line))
        .collect()
}

/// Marker placed in front of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordinal(usize),
}

impl ListMarker {
    fn prefix(self) -> String {
        match self {
            ListMarker::Bullet => "* ".to_string(),
            ListMarker::Ordinal(position) => format!("{position}. "),
        }
    }

    /// Marker for the child at `position` (zero-based) beneath an item using `self`.
    ///
    /// Bullet items force every descendant to bullets; ordinal items number
    /// their children by position.
    fn for_child(self, position: usize) -> Self {
        match self {
            ListMarker::Bullet => ListMarker::Bullet,
            ListMarker::Ordinal(_) => ListMarker::Ordinal(position + 1),
        }
    }
}

/// Render one list item and its subtree, one line per item, indented one tab per depth.
pub fn render_list_item(item: &ListItem, depth: usize, marker: ListMarker) -> Vec<String> {
    let indent: String = std::iter::repeat_n(INDENT, depth).collect();
    let mut lines = vec![format!("{indent}{}{}", marker.prefix(), item.content)];

    for (position, child) in item.items.iter().enumerate() {
        lines.extend(render_list_item(child, depth + 1, marker.for_child(position)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blocks::{ChecklistItem, ImageFile, TextData};
    use serde_json::Map;

    fn block(body: BlockBody) -> Block {
        Block::new("b", body)
    }

    fn list(style: ListStyle, items: Vec<ListItem>) -> Block {
        block(BlockBody::List(ListData {
            style,
            items,
            extra: Map::new(),
        }))
    }

    #[test]
    fn header_uses_one_hash_per_level() {
        for level in 1..=6u8 {
            let out = serialize(&[block(BlockBody::Header(HeaderData {
                text: "Title".into(),
                level,
            }))]);
            assert_eq!(out, format!("{} Title\n", "#".repeat(level as usize)));
        }
    }

    #[test]
    fn blocks_are_separated_by_blank_line() {
        let out = serialize(&[
            block(BlockBody::Paragraph(TextData {
                text: "first".into(),
            })),
            block(BlockBody::Quote(QuoteData {
                text: "  quoted  ".into(),
                caption: "ignored".into(),
                alignment: Some("left".into()),
            })),
        ]);
        assert_eq!(out, "first\n\n> quoted\n");
    }

    #[test]
    fn ordered_list_numbers_nested_items_by_position() {
        let out = serialize(&[list(
            ListStyle::Ordered,
            vec![
                ListItem::with_children(
                    "a",
                    vec![ListItem::leaf("a.1"), ListItem::leaf("a.2")],
                ),
                ListItem::leaf("b"),
            ],
        )]);
        assert_eq!(out, "1. a\n\t1. a.1\n\t2. a.2\n2. b\n");
    }

    #[test]
    fn unordered_list_forces_bullets_on_descendants() {
        let out = serialize(&[list(
            ListStyle::Unordered,
            vec![ListItem::with_children(
                "root",
                vec![
                    ListItem::leaf("x"),
                    ListItem::with_children("y", vec![ListItem::leaf("z")]),
                ],
            )],
        )]);
        assert_eq!(out, "* root\n\t* x\n\t* y\n\t\t* z\n");
    }

    #[test]
    fn list_item_indentation_tracks_depth() {
        let lines = render_list_item(&ListItem::leaf("deep"), 3, ListMarker::Ordinal(4));
        assert_eq!(lines, vec!["\t\t\t4. deep".to_string()]);
    }

    #[test]
    fn checklist_marks_checked_items() {
        let out = serialize(&[block(BlockBody::Checklist(ChecklistData {
            items: vec![
                ChecklistItem {
                    text: "done".into(),
                    checked: true,
                },
                ChecklistItem {
                    text: "todo".into(),
                    checked: false,
                },
            ],
        }))]);
        assert_eq!(out, "- [x] done\n- [ ] todo\n");
    }

    #[test]
    fn code_block_defaults_language_to_plain() {
        let with_lang = serialize(&[block(BlockBody::Code(CodeData {
            code: "fmt.Println()".into(),
            language: Some("go".into()),
            extra: Map::new(),
        }))]);
        assert!(with_lang.starts_with("```go\n"));
        assert_eq!(with_lang, "```go\nfmt.Println()\n```\n");

        let without = serialize(&[block(BlockBody::Code(CodeData {
            code: "x".into(),
            language: None,
            extra: Map::new(),
        }))]);
        assert!(without.starts_with("```plain\n"));
    }

    #[test]
    fn image_and_inline_text_render_markdown_forms() {
        let out = serialize(&[
            block(BlockBody::Image(ImageData {
                file: ImageFile {
                    url: "https://cdn.example.com/cat.png".into(),
                    extra: Map::new(),
                },
                caption: "cat".into(),
                extra: Map::new(),
            })),
            block(BlockBody::Text(TextData { text: "ls".into() })),
        ]);
        assert_eq!(out, "![cat](https://cdn.example.com/cat.png)\n\n`ls`\n");
    }

    #[test]
    fn unsupported_blocks_are_omitted() {
        let out = serialize(&[
            block(BlockBody::Unsupported {
                kind: "embed".into(),
                data: serde_json::json!({}),
            }),
            block(BlockBody::Paragraph(TextData { text: "kept".into() })),
        ]);
        assert_eq!(out, "kept\n");
    }

    #[test]
    fn serialization_is_deterministic() {
        let blocks = vec![
            block(BlockBody::Paragraph(TextData { text: "p".into() })),
            list(ListStyle::Ordered, vec![ListItem::leaf("i")]),
        ];
        assert_eq!(serialize(&blocks), serialize(&blocks));
    }

    #[test]
    fn excerpt_source_keeps_only_paragraphs() {
        let blocks = vec![
            block(BlockBody::Header(HeaderData {
                text: "Heading".into(),
                level: 1,
            })),
            block(BlockBody::Paragraph(TextData { text: "one".into() })),
            block(BlockBody::Paragraph(TextData { text: "two".into() })),
        ];
        assert_eq!(excerpt_source(&blocks), "one\n\ntwo");
    }
}
