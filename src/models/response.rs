//! Pipeline Responses
//!
//! The externally-visible response union: a modification preview, a
//! clarification request, or an error payload. This is the sole contract the
//! surrounding application consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copydesk_core::{ChangesSummary, Modification};
use copydesk_scoring::{ReadabilityCheck, SeoCheck};

use super::stages::{ActionType, Intent, Scope};

/// Diagnostics surfaced alongside a preview so the host can explain the edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInsights {
    /// Perceived intent
    pub intent: Intent,
    /// Perception confidence, 0-1
    pub confidence: f32,
    /// Perceived scope
    pub scope: Scope,
    /// Planned action
    pub action_type: ActionType,
    /// Whether external search ran
    pub used_search: bool,
    /// Source URLs consulted, when search ran
    pub search_sources: Vec<String>,
    /// Completeness quality score, 0-10
    pub quality_score: f32,
    /// SEO check result
    pub seo: SeoCheck,
    /// Readability check result
    pub readability: ReadabilityCheck,
}

/// A previewable set of edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationPreviewPayload {
    /// Conversation this reply belongs to
    pub conversation_id: String,
    /// Unique ID of this reply
    pub message_id: String,
    /// When the reply was assembled
    pub created_at: DateTime<Utc>,
    /// Human-readable explanation of the edit
    pub explanation: String,
    /// The edits to preview/apply
    pub modifications: Vec<Modification>,
    /// Aggregate diff statistics
    pub changes_summary: ChangesSummary,
    /// Stage diagnostics
    pub insights: ToolInsights,
}

/// A request for the user to disambiguate before editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationPayload {
    /// Conversation this reply belongs to
    pub conversation_id: String,
    /// Unique ID of this reply
    pub message_id: String,
    /// Questions for the user
    pub questions: Vec<String>,
    /// Section titles the user can pick from
    pub candidate_sections: Vec<String>,
}

/// A terminal failure reply. Carries only the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Conversation this reply belongs to
    pub conversation_id: String,
    /// Unique ID of this reply
    pub message_id: String,
    /// What went wrong, as user-visible text
    pub message: String,
}

/// The pipeline's reply union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineResponse {
    /// Scored edits ready for preview
    ModificationPreview(ModificationPreviewPayload),
    /// The instruction was ambiguous; the user must pick a target
    Clarification(ClarificationPayload),
    /// A fatal pipeline error
    Error(ErrorPayload),
}

impl PipelineResponse {
    /// The conversation ID carried by any variant.
    pub fn conversation_id(&self) -> &str {
        match self {
            PipelineResponse::ModificationPreview(p) => &p.conversation_id,
            PipelineResponse::Clarification(p) => &p.conversation_id,
            PipelineResponse::Error(p) => &p.conversation_id,
        }
    }

    /// Whether this reply is a modification preview.
    pub fn is_preview(&self) -> bool {
        matches!(self, PipelineResponse::ModificationPreview(_))
    }
}
