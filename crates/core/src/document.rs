//! Derived Document Structure
//!
//! Output types of the document analyzer: a heading outline, a flat section
//! partition, and whole-document statistics. All of it is a pure function of
//! the block sequence and is cached by content hash, so none of these types
//! carry assigned identifiers.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// One heading and its nested sub-headings.
///
/// Invariants: every child has a strictly greater level than its parent, and
/// siblings appear in source order (non-decreasing `block_index`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    /// Heading level (1 = H1 .. 6 = H6)
    pub level: u8,
    /// Heading text
    pub title: String,
    /// Index of the heading block in the source block sequence
    pub block_index: usize,
    /// Nested sub-headings
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a leaf outline node.
    pub fn new(level: u8, title: impl Into<String>, block_index: usize) -> Self {
        Self {
            level,
            title: title.into(),
            block_index,
            children: Vec::new(),
        }
    }

    /// Depth of the subtree rooted at this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// A contiguous half-open run of blocks following one heading.
///
/// Sections partition the whole block sequence with no gaps or overlaps. A
/// document without headings yields exactly one section with `heading: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// The heading this section follows, if any
    pub heading: Option<OutlineNode>,
    /// The section's content blocks (heading block excluded)
    pub content: Vec<Block>,
    /// Word count of the content blocks
    pub word_count: usize,
    /// Index of the first block covered by this section (the heading, if any)
    pub start_index: usize,
    /// One past the index of the last block covered
    pub end_index: usize,
}

impl Section {
    /// The section title, or an empty string for a headingless section.
    pub fn title(&self) -> &str {
        self.heading.as_ref().map(|h| h.title.as_str()).unwrap_or("")
    }

    /// Whether any content block is a heading of the given level.
    pub fn has_heading_of_level(&self, level: u8) -> bool {
        self.content
            .iter()
            .any(|b| b.heading_level() == Some(level))
    }
}

/// Whole-document statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    /// Whitespace-tokenized word count over all blocks
    pub total_words: usize,
    /// Number of paragraph blocks
    pub total_paragraphs: usize,
    /// Number of heading blocks
    pub total_headings: usize,
    /// Reading time at 200 words per minute, rounded up
    pub reading_time_minutes: usize,
    /// Average sentence length in words
    pub avg_sentence_length: f32,
}

/// The analyzer's full output: outline forest, section partition, stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStructure {
    /// Top-level outline nodes (a forest, not necessarily single-rooted)
    pub outline: Vec<OutlineNode>,
    /// Flat section partition in document order
    pub sections: Vec<Section>,
    /// Whole-document statistics
    pub stats: DocumentStats,
}

impl Default for OutlineNode {
    fn default() -> Self {
        Self::new(1, "", 0)
    }
}

impl DocumentStructure {
    /// Find a section by exact title match.
    pub fn section_by_title(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title() == title)
    }

    /// Titles of all level-2 sections in document order.
    pub fn level2_titles(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter_map(|s| s.heading.as_ref())
            .filter(|h| h.level == 2)
            .map(|h| h.title.clone())
            .collect()
    }
}
