//! Stage Results
//!
//! Intermediate results handed from one pipeline stage to the next. All of
//! these are created fresh per request and never mutated after construction.

use serde::{Deserialize, Serialize};

use copydesk_core::DocumentStructure;
use copydesk_llm::SearchResult;

/// Summary placeholder used when the search provider is unreachable.
pub const SEARCH_UNAVAILABLE_SUMMARY: &str = "Web search is currently unavailable; no external sources were consulted. / 网络搜索暂不可用，未参考外部资料。";

/// What the user wants done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Change existing content
    ModifyContent,
    /// Add new content
    AddContent,
    /// Remove content
    DeleteContent,
    /// Improve tone/wording without changing meaning
    ImproveWriting,
    /// Verify claims against external facts
    FactCheck,
    /// Ask a question about the document
    Question,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::ModifyContent => write!(f, "modify_content"),
            Intent::AddContent => write!(f, "add_content"),
            Intent::DeleteContent => write!(f, "delete_content"),
            Intent::ImproveWriting => write!(f, "improve_writing"),
            Intent::FactCheck => write!(f, "fact_check"),
            Intent::Question => write!(f, "question"),
        }
    }
}

/// How much of the document the instruction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The entire article
    FullArticle,
    /// Several named or counted sections
    MultipleParagraphs,
    /// One section
    SingleParagraph,
    /// Could not be determined
    Unknown,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::FullArticle => write!(f, "full_article"),
            Scope::MultipleParagraphs => write!(f, "multiple_paragraphs"),
            Scope::SingleParagraph => write!(f, "single_paragraph"),
            Scope::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where in the document the instruction points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphAnalysis {
    /// Detected scope
    pub scope: Scope,
    /// Matched section titles, in document order
    pub target_titles: Vec<String>,
    /// Section indices for the matched titles
    pub target_indices: Vec<usize>,
    /// Whether the target section would benefit from subheadings
    pub needs_subheadings: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Unknown
    }
}

/// Output of the perception stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerceptionResult {
    /// Classified intent
    pub intent: Intent,
    /// Confidence in the scope/intent read, 0-1
    pub confidence: f32,
    /// The analyzed document
    pub document_structure: DocumentStructure,
    /// Entities mentioned by the instruction
    pub extracted_entities: Vec<String>,
    /// Where the instruction points
    pub paragraph_analysis: ParagraphAnalysis,
}

/// The concrete edit action a plan commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Grow the target section with new material
    Expand,
    /// Rewrite the target section
    Rewrite,
    /// Insert a new section or passage
    Insert,
    /// Delete the target
    Delete,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Expand => write!(f, "expand"),
            ActionType::Rewrite => write!(f, "rewrite"),
            ActionType::Insert => write!(f, "insert"),
            ActionType::Delete => write!(f, "delete"),
        }
    }
}

/// Action plus size estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    /// What to do
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Roughly how many words to produce
    #[serde(default)]
    pub estimated_words: usize,
}

/// Where the plan points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLocation {
    /// Target section title, when resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    /// Target section index, when resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_index: Option<usize>,
}

/// Output of the planning stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResult {
    /// The model's (or rule engine's) reasoning trace
    #[serde(default)]
    pub thought_process: String,
    /// Where to apply the edit
    #[serde(default)]
    pub target_location: TargetLocation,
    /// What to do and how much
    pub action_plan: ActionPlan,
    /// Whether external facts should be gathered first
    #[serde(default)]
    pub needs_search: bool,
    /// Search queries, when search is requested
    #[serde(default)]
    pub search_queries: Vec<String>,
    /// Whether the user must disambiguate before anything can run
    #[serde(default)]
    pub clarification_needed: bool,
    /// Questions to put to the user
    #[serde(default)]
    pub clarification_questions: Vec<String>,
    /// Optional editorial suggestions surfaced alongside the edit
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Output of the retrieval stage. Ephemeral; never cached beyond the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    /// Deduplicated raw results, provider order preserved
    pub raw_results: Vec<SearchResult>,
    /// Summarized findings (LLM or fallback)
    pub summary: String,
    /// Source URLs
    pub sources: Vec<String>,
}

impl SearchContext {
    /// The context returned when the provider fails outright.
    pub fn unavailable() -> Self {
        Self {
            raw_results: Vec::new(),
            summary: SEARCH_UNAVAILABLE_SUMMARY.to_string(),
            sources: Vec::new(),
        }
    }

    /// Whether this context is the unavailable placeholder.
    pub fn is_unavailable(&self) -> bool {
        self.summary == SEARCH_UNAVAILABLE_SUMMARY
    }

    /// Whether this context carries material generation can build on.
    pub fn has_usable_content(&self, min_summary_chars: usize) -> bool {
        if self.is_unavailable() {
            return !self.raw_results.is_empty();
        }
        self.summary.chars().count() >= min_summary_chars || !self.raw_results.is_empty()
    }
}
