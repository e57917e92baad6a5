//! Content Blocks
//!
//! The typed content unit the pipeline operates on. Editor frontends ship
//! blocks in several duck-typed JSON shapes (a bare string, an array of inline
//! runs, or nothing at all); `BlockContent::normalize` converts every source
//! shape into one closed union at ingestion so the analysis stages never see
//! raw JSON. Blocks are immutable once read; edits always construct new
//! blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type of a content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BlockKind {
    /// A heading with its level (1 = H1 .. 6 = H6)
    Heading { level: u8 },
    /// A prose paragraph
    Paragraph,
    /// One item of a bulleted list
    BulletListItem,
    /// One item of a numbered list
    NumberedListItem,
    /// A block quote
    Quote,
    /// A fenced code block
    CodeBlock,
    /// Any block type the pipeline does not treat specially
    Other { name: String },
}

impl BlockKind {
    /// Parse an editor block-type string into a kind.
    ///
    /// Heading levels are read from the block's `props.level`, clamped to 1-6.
    pub fn from_type_str(type_str: &str, level: Option<u8>) -> Self {
        match type_str {
            "heading" => BlockKind::Heading {
                level: level.unwrap_or(1).clamp(1, 6),
            },
            "paragraph" => BlockKind::Paragraph,
            "bulletListItem" => BlockKind::BulletListItem,
            "numberedListItem" => BlockKind::NumberedListItem,
            "quote" => BlockKind::Quote,
            "codeBlock" => BlockKind::CodeBlock,
            other => BlockKind::Other {
                name: other.to_string(),
            },
        }
    }
}

/// One styled run of inline text inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRun {
    /// The run's text content
    pub text: String,
}

impl InlineRun {
    /// Create a run from any text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Closed union over the duck-typed source shapes of block content.
///
/// Source documents carry content as a bare string, an array of run objects,
/// or omit it entirely. Normalization happens exactly once, at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// A single unstyled text value
    PlainText { text: String },
    /// An ordered list of inline runs
    Runs { runs: Vec<InlineRun> },
    /// No content (e.g. an empty paragraph used as spacing)
    Empty,
}

impl BlockContent {
    /// Normalize a raw JSON content value into the closed union.
    ///
    /// Accepted shapes:
    /// - `null` / missing -> `Empty`
    /// - `"text"` -> `PlainText`
    /// - `[{"text": ".."} | ".." , ...]` -> `Runs`
    /// - `{"text": ".."}` -> a single-run `Runs`
    ///
    /// Anything else degrades to `Empty` rather than erroring; malformed
    /// content is treated as an empty block, not a failed document.
    pub fn normalize(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => BlockContent::Empty,
            Some(Value::String(s)) => BlockContent::PlainText { text: s.clone() },
            Some(Value::Array(items)) => {
                let runs: Vec<InlineRun> = items.iter().filter_map(run_from_value).collect();
                if runs.is_empty() {
                    BlockContent::Empty
                } else {
                    BlockContent::Runs { runs }
                }
            }
            Some(obj @ Value::Object(_)) => match run_from_value(obj) {
                Some(run) => BlockContent::Runs { runs: vec![run] },
                None => BlockContent::Empty,
            },
            Some(_) => BlockContent::Empty,
        }
    }

    /// Concatenated plain text of this content.
    pub fn plain_text(&self) -> String {
        match self {
            BlockContent::PlainText { text } => text.clone(),
            BlockContent::Runs { runs } => {
                runs.iter().map(|r| r.text.as_str()).collect::<String>()
            }
            BlockContent::Empty => String::new(),
        }
    }

    /// Whether this content carries no text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            BlockContent::Empty => true,
            BlockContent::PlainText { text } => text.trim().is_empty(),
            BlockContent::Runs { runs } => runs.iter().all(|r| r.text.trim().is_empty()),
        }
    }
}

fn run_from_value(value: &Value) -> Option<InlineRun> {
    match value {
        Value::String(s) => Some(InlineRun::new(s.clone())),
        Value::Object(map) => {
            let text = map
                .get("text")
                .or_else(|| map.get("content"))
                .and_then(|v| v.as_str())?;
            Some(InlineRun::new(text))
        }
        _ => None,
    }
}

/// One typed unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// What kind of block this is
    #[serde(flatten)]
    pub kind: BlockKind,
    /// The block's normalized inline content
    pub content: BlockContent,
}

impl Block {
    /// Create a block with already-normalized content.
    pub fn new(kind: BlockKind, content: BlockContent) -> Self {
        Self { kind, content }
    }

    /// Create a heading block.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(
            BlockKind::Heading {
                level: level.clamp(1, 6),
            },
            BlockContent::PlainText { text: text.into() },
        )
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(
            BlockKind::Paragraph,
            BlockContent::PlainText { text: text.into() },
        )
    }

    /// Create a bullet list item block.
    pub fn bullet_item(text: impl Into<String>) -> Self {
        Self::new(
            BlockKind::BulletListItem,
            BlockContent::PlainText { text: text.into() },
        )
    }

    /// Normalize one raw editor block.
    ///
    /// Expected shape is `{"type": "...", "props": {...}, "content": ...}`;
    /// anything malformed degrades to an empty paragraph so a single bad
    /// block never fails the whole document.
    pub fn normalized(value: &Value) -> Self {
        let type_str = value
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("paragraph");
        let level = value
            .get("props")
            .and_then(|p| p.get("level"))
            .and_then(|l| l.as_u64())
            .map(|l| l.min(6) as u8);
        Self::new(
            BlockKind::from_type_str(type_str, level),
            BlockContent::normalize(value.get("content")),
        )
    }

    /// Normalize a raw block array, tolerating a non-array value.
    pub fn normalized_all(value: &Value) -> Vec<Block> {
        match value {
            Value::Array(items) => items.iter().map(Block::normalized).collect(),
            _ => Vec::new(),
        }
    }

    /// Concatenated plain text of this block.
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }

    /// Whitespace-tokenized word count of this block.
    pub fn word_count(&self) -> usize {
        self.plain_text().split_whitespace().count()
    }

    /// The heading level if this block is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// Whether this block is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Whether this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, BlockKind::Paragraph)
    }
}
