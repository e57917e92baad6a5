//! Copydesk - Document Editing Pipeline
//!
//! Given a free-text instruction and a block-structured article, Copydesk
//! decides what to change, optionally gathers external facts, generates
//! replacement content, and returns a scored, previewable set of edits.
//! It includes:
//! - Perception, planning, retrieval, and generation stages with per-stage fallbacks
//! - A best-effort cache layer for document structure and style profiles
//! - Heuristic SEO / readability / quality scoring over the generated edits
//! - An orchestrator that owns conversation identity and response assembly
//!
//! The host application supplies the external collaborators (LLM caller,
//! search provider, cache backend, history store) through the trait seams in
//! `copydesk-core` and `copydesk-llm`.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export the pipeline surface the host application touches
pub use config::PipelineConfig;
pub use models::request::EditRequest;
pub use models::response::{
    ClarificationPayload, ErrorPayload, ModificationPreviewPayload, PipelineResponse, ToolInsights,
};
pub use models::stages::{
    ActionPlan, ActionType, Intent, ParagraphAnalysis, PerceptionResult, PlanningResult, Scope,
    SearchContext,
};
pub use services::cache::{DocumentCache, MokaCacheBackend, NoopCacheBackend};
pub use services::orchestrator::{Orchestrator, PipelineState};
pub use utils::error::{PipelineError, PipelineResult};
