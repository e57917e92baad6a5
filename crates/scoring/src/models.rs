//! Check Result Types
//!
//! Result shapes for the scoring checks. Scores are 0-10; findings are short
//! human-readable notes surfaced in the preview payload.

use serde::{Deserialize, Serialize};

/// Result of the SEO heuristic check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoCheck {
    /// Combined score, 0-10
    pub score: f32,
    /// Title length in characters
    pub title_length: usize,
    /// Number of level-2 headings in the content
    pub heading_count: usize,
    /// Number of level-3 headings in the content
    pub subheading_count: usize,
    /// Primary-keyword occurrence rate over all words
    pub keyword_density: f32,
    /// Heuristic findings
    pub findings: Vec<String>,
}

/// Reading difficulty grade derived from average sentence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityGrade {
    /// Short sentences, easy scanning
    Easy,
    /// Moderate sentence length
    Medium,
    /// Long sentences, dense prose
    Hard,
}

impl std::fmt::Display for ReadabilityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadabilityGrade::Easy => write!(f, "easy"),
            ReadabilityGrade::Medium => write!(f, "medium"),
            ReadabilityGrade::Hard => write!(f, "hard"),
        }
    }
}

/// Result of the readability heuristic check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityCheck {
    /// Combined score, 0-10
    pub score: f32,
    /// Difficulty grade
    pub grade: ReadabilityGrade,
    /// Average sentence length in characters
    pub avg_sentence_chars: f32,
    /// Ratio of complex tokens (jargon/code proxies) to all tokens
    pub complex_token_ratio: f32,
    /// Heuristic findings
    pub findings: Vec<String>,
}
