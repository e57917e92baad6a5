//! Modifications
//!
//! The atomic edit operations the pipeline returns. The editor applies these
//! to its own block tree; the pipeline only decides and describes them.

use serde::{Deserialize, Serialize};

/// The kind of edit to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    /// Append content at the end of the target section
    Append,
    /// Insert content at a position
    Insert,
    /// Replace the target section's content
    Replace,
    /// Replace a single paragraph by index
    ReplaceParagraph,
    /// Delete the target
    Delete,
    /// Change the document title
    UpdateTitle,
    /// Add a brand new section
    AddSection,
}

impl std::fmt::Display for ModificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModificationType::Append => write!(f, "append"),
            ModificationType::Insert => write!(f, "insert"),
            ModificationType::Replace => write!(f, "replace"),
            ModificationType::ReplaceParagraph => write!(f, "replace_paragraph"),
            ModificationType::Delete => write!(f, "delete"),
            ModificationType::UpdateTitle => write!(f, "update_title"),
            ModificationType::AddSection => write!(f, "add_section"),
        }
    }
}

/// One atomic, typed edit operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    /// What kind of edit this is
    #[serde(rename = "type")]
    pub modification_type: ModificationType,
    /// New content in markdown flavor (## / ### headings, blank-line paragraphs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Target section title, when the edit is section-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Block position for insertions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Paragraph index for paragraph-scoped replacement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_index: Option<usize>,
}

impl Modification {
    /// Append content to a section.
    pub fn append(target: Option<String>, content: impl Into<String>) -> Self {
        Self {
            modification_type: ModificationType::Append,
            content: Some(content.into()),
            target,
            position: None,
            paragraph_index: None,
        }
    }

    /// Insert content at a block position.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            modification_type: ModificationType::Insert,
            content: Some(content.into()),
            target: None,
            position: Some(position),
            paragraph_index: None,
        }
    }

    /// Replace a section's content.
    pub fn replace(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            modification_type: ModificationType::Replace,
            content: Some(content.into()),
            target: Some(target.into()),
            position: None,
            paragraph_index: None,
        }
    }

    /// Replace one paragraph by index.
    pub fn replace_paragraph(paragraph_index: usize, content: impl Into<String>) -> Self {
        Self {
            modification_type: ModificationType::ReplaceParagraph,
            content: Some(content.into()),
            target: None,
            position: None,
            paragraph_index: Some(paragraph_index),
        }
    }

    /// Delete a target section.
    pub fn delete(target: impl Into<String>) -> Self {
        Self {
            modification_type: ModificationType::Delete,
            content: None,
            target: Some(target.into()),
            position: None,
            paragraph_index: None,
        }
    }

    /// Add a new section.
    pub fn add_section(content: impl Into<String>) -> Self {
        Self {
            modification_type: ModificationType::AddSection,
            content: Some(content.into()),
            target: None,
            position: None,
            paragraph_index: None,
        }
    }

    /// Word count of this modification's content.
    pub fn word_count(&self) -> usize {
        self.content
            .as_deref()
            .map(|c| c.split_whitespace().count())
            .unwrap_or(0)
    }
}

/// Aggregate size of a set of modifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesSummary {
    /// Net words added across all modifications
    pub words_added: i64,
    /// Change in document reading time, in minutes
    pub reading_time_delta_minutes: i64,
}

/// The generation stage's output. All three generation tiers produce this
/// same shape so upstream code is tier-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// The edits to preview/apply
    pub modifications: Vec<Modification>,
    /// Human-readable explanation of what was done
    pub explanation: String,
    /// Aggregate change size
    pub changes_summary: ChangesSummary,
}

impl GenerationResult {
    /// Total words across all modification contents.
    pub fn words_generated(&self) -> usize {
        self.modifications.iter().map(Modification::word_count).sum()
    }
}
