//! Orchestrator
//!
//! Sequences the pipeline stages over one request and assembles the reply.
//! Two fan-out points run concurrently: cache lookups alongside perception
//! before planning, and the three scoring checks after generation. The
//! orchestrator never retries; every retry lives inside a stage's own
//! fallback. Any error that escapes stage containment becomes an error
//! payload carrying the message.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use copydesk_core::{CacheBackend, HistoryStore, WritingStyleProfile};
use copydesk_llm::{LlmClient, SearchProvider};
use copydesk_scoring::{check_readability, check_seo, quality_score};

use crate::config::PipelineConfig;
use crate::models::request::EditRequest;
use crate::models::response::{
    ClarificationPayload, ErrorPayload, ModificationPreviewPayload, PipelineResponse, ToolInsights,
};
use crate::models::stages::{PerceptionResult, PlanningResult, SearchContext};
use crate::services::cache::DocumentCache;
use crate::services::{generation, perception, planner, retrieval, style};
use crate::utils::error::{PipelineError, PipelineResult};

/// Pipeline states over one request. `Delivered`, `ClarificationRequested`,
/// and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Request accepted
    Start,
    /// Cache lookups and perception running
    Perceiving,
    /// Planning the edit
    Planning,
    /// Gathering external facts
    Retrieving,
    /// Producing content
    Generating,
    /// Scoring the produced content
    Scoring,
    /// Preview returned
    Delivered,
    /// The user must disambiguate
    ClarificationRequested,
    /// A fatal error was surfaced
    Error,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineState::Start => "start",
            PipelineState::Perceiving => "perceiving",
            PipelineState::Planning => "planning",
            PipelineState::Retrieving => "retrieving",
            PipelineState::Generating => "generating",
            PipelineState::Scoring => "scoring",
            PipelineState::Delivered => "delivered",
            PipelineState::ClarificationRequested => "clarification_requested",
            PipelineState::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// The editing pipeline. All collaborators are injected; a no-op cache
/// backend or a mock LLM drops in without touching pipeline code.
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchProvider>,
    history: Arc<dyn HistoryStore>,
    cache: DocumentCache,
    config: PipelineConfig,
}

impl Orchestrator {
    /// Create a pipeline from its four collaborators and a configuration.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchProvider>,
        cache_backend: Arc<dyn CacheBackend>,
        history: Arc<dyn HistoryStore>,
        config: PipelineConfig,
    ) -> Self {
        let cache = DocumentCache::new(cache_backend, &config);
        Self {
            llm,
            search,
            history,
            cache,
            config,
        }
    }

    /// Run one editing request to a terminal state. Never panics or errors;
    /// failures become an error payload.
    pub async fn execute(&self, request: EditRequest) -> PipelineResponse {
        let conversation_id = request
            .conversation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let message_id = Uuid::new_v4().to_string();

        info!(
            conversation_id,
            post_id = %request.post_id,
            state = %PipelineState::Start,
            "pipeline request accepted"
        );

        match self.run(&request, &conversation_id, &message_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(conversation_id, state = %PipelineState::Error, error = %e, "pipeline failed");
                PipelineResponse::Error(ErrorPayload {
                    conversation_id,
                    message_id,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Cache diagnostics passthrough. Not on the request hot path.
    pub async fn cache_stats(&self) -> crate::services::cache::CacheStats {
        self.cache.stats().await
    }

    async fn run(
        &self,
        request: &EditRequest,
        conversation_id: &str,
        message_id: &str,
    ) -> PipelineResult<PipelineResponse> {
        if request.message.trim().is_empty() {
            return Err(PipelineError::validation("instruction must not be empty"));
        }
        let blocks = request.blocks();

        // Fan-out 1: structure lookup, style resolution, and perception run
        // together and join before planning.
        debug!(state = %PipelineState::Perceiving, "entering");
        let (perception, cached_structure, style_profile) = tokio::join!(
            async { perception::perceive(&request.message, &blocks) },
            self.cache.get_structure(&request.post_id, &blocks),
            self.resolve_style(&request.user_id),
        );
        if cached_structure.is_none() {
            self.cache
                .put_structure(&request.post_id, &blocks, &perception.document_structure)
                .await;
        }

        debug!(state = %PipelineState::Planning, "entering");
        let planning = planner::plan(
            self.llm.as_ref(),
            &perception,
            &request.message,
            &self.config,
        )
        .await;

        if planning.clarification_needed {
            info!(conversation_id, state = %PipelineState::ClarificationRequested, "clarification requested");
            return Ok(PipelineResponse::Clarification(ClarificationPayload {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
                questions: planning.clarification_questions.clone(),
                candidate_sections: perception.document_structure.level2_titles(),
            }));
        }

        let search_context = if planning.needs_search {
            debug!(state = %PipelineState::Retrieving, "entering");
            Some(
                retrieval::retrieve(
                    self.search.as_ref(),
                    self.llm.as_ref(),
                    &planning.search_queries,
                    &self.config,
                )
                .await,
            )
        } else {
            None
        };

        debug!(state = %PipelineState::Generating, "entering");
        let generation = generation::generate(
            self.llm.as_ref(),
            &planning,
            search_context.as_ref(),
            &blocks,
            &request.message,
            Some(&style_profile),
            &self.config,
        )
        .await;

        // Fan-out 2: the three scoring checks join before assembly.
        debug!(state = %PipelineState::Scoring, "entering");
        let combined_content: String = generation
            .modifications
            .iter()
            .filter_map(|m| m.content.as_deref())
            .collect::<Vec<_>>()
            .join("\n\n");
        let words_generated = generation.words_generated();
        let target_words = planning.action_plan.estimated_words;
        let (quality, seo, readability) = tokio::join!(
            async { quality_score(words_generated, target_words) },
            async { check_seo(&request.current_title, &combined_content) },
            async { check_readability(&combined_content) },
        );

        let insights = build_insights(
            &perception,
            &planning,
            search_context.as_ref(),
            quality,
            seo,
            readability,
        );

        info!(
            conversation_id,
            state = %PipelineState::Delivered,
            modifications = generation.modifications.len(),
            "pipeline delivered"
        );
        Ok(PipelineResponse::ModificationPreview(
            ModificationPreviewPayload {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
                created_at: Utc::now(),
                explanation: generation.explanation,
                modifications: generation.modifications,
                changes_summary: generation.changes_summary,
                insights,
            },
        ))
    }

    /// Style profile with cache fast path; derives and back-fills on miss.
    async fn resolve_style(&self, user_id: &str) -> WritingStyleProfile {
        if let Some(profile) = self.cache.get_style(user_id).await {
            return profile;
        }
        let profile =
            style::derive_profile(self.history.as_ref(), user_id, self.config.history_limit).await;
        self.cache.put_style(user_id, &profile).await;
        profile
    }
}

fn build_insights(
    perception: &PerceptionResult,
    planning: &PlanningResult,
    search_context: Option<&SearchContext>,
    quality: f32,
    seo: copydesk_scoring::SeoCheck,
    readability: copydesk_scoring::ReadabilityCheck,
) -> ToolInsights {
    ToolInsights {
        intent: perception.intent,
        confidence: perception.confidence,
        scope: perception.paragraph_analysis.scope,
        action_type: planning.action_plan.action_type,
        used_search: search_context.is_some(),
        search_sources: search_context
            .map(|c| c.sources.clone())
            .unwrap_or_default(),
        quality_score: quality,
        seo,
        readability,
    }
}
