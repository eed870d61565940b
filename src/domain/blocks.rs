//! Block model mirrored from the editor's saved output.
//!
//! The wire shape is `{ "id", "type", "data" }`. Each known `type` maps to a
//! typed payload; anything the server does not understand is kept verbatim as
//! [`BlockBody::Unsupported`] so it round-trips back to the editor untouched.

use serde::{
    Deserialize, Serialize, Serializer,
    ser::SerializeStruct,
};
use serde_json::{Map, Value};

/// One unit of structured content produced by the editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub body: BlockBody,
}

impl Block {
    pub fn new(id: impl Into<String>, body: BlockBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    Paragraph(TextData),
    Header(HeaderData),
    Quote(QuoteData),
    List(ListData),
    Checklist(ChecklistData),
    Image(ImageData),
    Code(CodeData),
    Text(TextData),
    Unsupported { kind: String, data: Value },
}

impl BlockBody {
    /// The editor tool name this body is stored under.
    pub fn kind(&self) -> &str {
        match self {
            BlockBody::Paragraph(_) => "paragraph",
            BlockBody::Header(_) => "header",
            BlockBody::Quote(_) => "quote",
            BlockBody::List(_) => "list",
            BlockBody::Checklist(_) => "checklist",
            BlockBody::Image(_) => "image",
            BlockBody::Code(_) => "code",
            BlockBody::Text(_) => "text",
            BlockBody::Unsupported { kind, .. } => kind.as_str(),
        }
    }

    fn from_parts(kind: String, data: Value) -> Self {
        let parsed = match kind.as_str() {
            "paragraph" => Some(TextData::deserialize(&data).map(BlockBody::Paragraph)),
            "header" => Some(HeaderData::deserialize(&data).map(BlockBody::Header)),
            "quote" => Some(QuoteData::deserialize(&data).map(BlockBody::Quote)),
            "list" => Some(ListData::deserialize(&data).map(BlockBody::List)),
            "checklist" => Some(ChecklistData::deserialize(&data).map(BlockBody::Checklist)),
            "image" => Some(ImageData::deserialize(&data).map(BlockBody::Image)),
            "code" => Some(CodeData::deserialize(&data).map(BlockBody::Code)),
            "text" => Some(TextData::deserialize(&data).map(BlockBody::Text)),
            _ => None,
        };

        match parsed {
            Some(Ok(body)) => body,
            _ => BlockBody::Unsupported { kind, data },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderData {
    pub text: String,
    #[serde(default = "default_header_level")]
    pub level: u8,
}

fn default_header_level() -> u8 {
    2
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteData {
    pub text: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListData {
    pub style: ListStyle,
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node in a nested list; depth is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: String,
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListItem {
    pub fn leaf(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_children(content: impl Into<String>, items: Vec<ListItem>) -> Self {
        Self {
            content: content.into(),
            items,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistData {
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub file: ImageFile,
    #[serde(default)]
    pub caption: String,
    /// Display flags such as `withBorder` or `stretched`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeData {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Self {
            id: raw.id,
            body: BlockBody::from_parts(raw.kind, raw.data),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.body.kind())?;
        match &self.body {
            BlockBody::Paragraph(data) | BlockBody::Text(data) => {
                state.serialize_field("data", data)?
            }
            BlockBody::Header(data) => state.serialize_field("data", data)?,
            BlockBody::Quote(data) => state.serialize_field("data", data)?,
            BlockBody::List(data) => state.serialize_field("data", data)?,
            BlockBody::Checklist(data) => state.serialize_field("data", data)?,
            BlockBody::Image(data) => state.serialize_field("data", data)?,
            BlockBody::Code(data) => state.serialize_field("data", data)?,
            BlockBody::Unsupported { data, .. } => state.serialize_field("data", data)?,
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_types_decode_into_typed_payloads() {
        let block: Block = serde_json::from_value(json!({
            "id": "h1",
            "type": "header",
            "data": { "text": "Hello", "level": 3 }
        }))
        .expect("header block");

        assert_eq!(block.id, "h1");
        assert_eq!(
            block.body,
            BlockBody::Header(HeaderData {
                text: "Hello".into(),
                level: 3
            })
        );
    }

    #[test]
    fn nested_list_items_decode_recursively() {
        let block: Block = serde_json::from_value(json!({
            "id": "l1",
            "type": "list",
            "data": {
                "style": "ordered",
                "items": [
                    { "content": "one", "items": [ { "content": "one.a", "items": [] } ] },
                    { "content": "two", "items": [] }
                ]
            }
        }))
        .expect("list block");

        let BlockBody::List(list) = block.body else {
            panic!("expected list body");
        };
        assert_eq!(list.style, ListStyle::Ordered);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].items[0].content, "one.a");
    }

    #[test]
    fn unknown_type_is_preserved_verbatim() {
        let raw = json!({
            "id": "x",
            "type": "embed",
            "data": { "service": "youtube", "source": "https://example.com" }
        });
        let block: Block = serde_json::from_value(raw.clone()).expect("unknown block");

        assert!(matches!(block.body, BlockBody::Unsupported { ref kind, .. } if kind == "embed"));
        assert_eq!(serde_json::to_value(&block).expect("serialize"), raw);
    }

    #[test]
    fn mismatched_data_shape_falls_back_to_unsupported() {
        let block: Block = serde_json::from_value(json!({
            "id": "c",
            "type": "code",
            "data": { "text": "not a code payload" }
        }))
        .expect("block");

        assert_eq!(block.body.kind(), "code");
        assert!(matches!(block.body, BlockBody::Unsupported { .. }));
    }

    #[test]
    fn image_flags_survive_reserialization() {
        let raw = json!({
            "id": "img",
            "type": "image",
            "data": {
                "file": { "url": "https://cdn.example.com/a.png" },
                "caption": "A",
                "withBorder": false,
                "stretched": true
            }
        });
        let block: Block = serde_json::from_value(raw.clone()).expect("image block");
        assert_eq!(serde_json::to_value(&block).expect("serialize"), raw);
    }
}
