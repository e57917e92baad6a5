//! Edit Request
//!
//! The single entry-point payload the surrounding application sends. The
//! article content arrives in the editor's raw JSON block format and is
//! normalized at ingestion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use copydesk_core::Block;

/// One editing request against one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// The user's free-text instruction
    pub message: String,
    /// Identifier of the article being edited
    pub post_id: String,
    /// The article's blocks in the editor's raw JSON shape
    pub current_content: Value,
    /// The article's title
    #[serde(default)]
    pub current_title: String,
    /// The requesting user, for style inference
    pub user_id: String,
    /// Caller-supplied conversation ID; echoed verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl EditRequest {
    /// Normalize the raw content into typed blocks.
    pub fn blocks(&self) -> Vec<Block> {
        Block::normalized_all(&self.current_content)
    }
}
