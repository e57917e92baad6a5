//! Orchestrator End-to-End Tests
//!
//! Full pipeline runs against mocked collaborators: the Mars scenario,
//! conversation identity, clarification flow, cache-failure transparency,
//! and the search path.

use std::sync::Arc;

use copydesk::{
    ActionType, EditRequest, Intent, NoopCacheBackend, Orchestrator, PipelineConfig,
    PipelineResponse, Scope,
};
use copydesk_core::ModificationType;
use copydesk_llm::SearchResult;

use crate::common::{
    generation_json, mars_raw_content, planning_json, CannedSearch, EmptyHistory, FailingLlm,
    ScriptedLlm, ThrowingCacheBackend,
};

fn request(message: &str, conversation_id: Option<&str>) -> EditRequest {
    EditRequest {
        message: message.to_string(),
        post_id: "post-1".to_string(),
        current_content: mars_raw_content(),
        current_title: "Mars".to_string(),
        user_id: "user-1".to_string(),
        conversation_id: conversation_id.map(str::to_string),
    }
}

fn orchestrator(llm: Arc<dyn copydesk_llm::LlmClient>) -> Orchestrator {
    Orchestrator::new(
        llm,
        Arc::new(CannedSearch(Vec::new())),
        Arc::new(NoopCacheBackend),
        Arc::new(EmptyHistory),
        PipelineConfig::default(),
    )
}

// ============================================================================
// The Mars Scenario
// ============================================================================

#[tokio::test]
async fn test_expand_history_end_to_end() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        planning_json("History", "expand", false),
        generation_json(
            "History",
            "The Viking landers of 1976 returned the first surface science from Mars.",
        ),
    ]));
    let response = orchestrator(llm)
        .execute(request("Expand the History section", None))
        .await;

    let PipelineResponse::ModificationPreview(preview) = response else {
        panic!("expected a modification preview");
    };
    assert_eq!(preview.insights.scope, Scope::SingleParagraph);
    assert_eq!(preview.insights.action_type, ActionType::Expand);
    assert_eq!(preview.insights.intent, Intent::ModifyContent);

    assert!(!preview.modifications.is_empty());
    let modification = &preview.modifications[0];
    assert!(matches!(
        modification.modification_type,
        ModificationType::Append | ModificationType::ReplaceParagraph
    ));
    assert!(!modification.content.as_deref().unwrap_or("").is_empty());
    assert!(preview.insights.quality_score > 0.0);
}

// ============================================================================
// Conversation Identity
// ============================================================================

#[tokio::test]
async fn test_minted_conversation_ids_never_collide() {
    let first = orchestrator(Arc::new(FailingLlm))
        .execute(request("Expand the History section", None))
        .await;
    let second = orchestrator(Arc::new(FailingLlm))
        .execute(request("Expand the History section", None))
        .await;
    assert_ne!(first.conversation_id(), second.conversation_id());
}

#[tokio::test]
async fn test_explicit_conversation_id_echoed() {
    let response = orchestrator(Arc::new(FailingLlm))
        .execute(request("Expand the History section", Some("conv-42")))
        .await;
    assert_eq!(response.conversation_id(), "conv-42");
}

// ============================================================================
// Clarification Flow
// ============================================================================

#[tokio::test]
async fn test_unresolvable_target_requests_clarification() {
    // The failing LLM forces the rule-based planner, which cannot resolve a
    // target for this instruction.
    let response = orchestrator(Arc::new(FailingLlm))
        .execute(request("make it sing", None))
        .await;

    let PipelineResponse::Clarification(clarification) = response else {
        panic!("expected a clarification payload");
    };
    assert!(!clarification.questions.is_empty());
    assert_eq!(
        clarification.candidate_sections,
        vec!["History".to_string(), "Future".to_string()]
    );
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn test_generation_never_fails_through_pipeline() {
    let response = orchestrator(Arc::new(FailingLlm))
        .execute(request("Expand the History section", None))
        .await;

    let PipelineResponse::ModificationPreview(preview) = response else {
        panic!("expected a preview even with every model call failing");
    };
    assert!(!preview.modifications.is_empty());
    assert!(preview.modifications[0]
        .content
        .as_deref()
        .unwrap()
        .contains("History"));
}

#[tokio::test]
async fn test_throwing_cache_backend_is_transparent() {
    let scripted = || {
        vec![
            planning_json("History", "expand", false),
            generation_json("History", "Same deterministic content either way."),
        ]
    };

    let with_cache_failure = Orchestrator::new(
        Arc::new(ScriptedLlm::new(scripted())),
        Arc::new(CannedSearch(Vec::new())),
        Arc::new(ThrowingCacheBackend),
        Arc::new(EmptyHistory),
        PipelineConfig::default(),
    )
    .execute(request("Expand the History section", Some("conv-cache")))
    .await;

    let without_cache = Orchestrator::new(
        Arc::new(ScriptedLlm::new(scripted())),
        Arc::new(CannedSearch(Vec::new())),
        Arc::new(NoopCacheBackend),
        Arc::new(EmptyHistory),
        PipelineConfig::default(),
    )
    .execute(request("Expand the History section", Some("conv-cache")))
    .await;

    let PipelineResponse::ModificationPreview(a) = with_cache_failure else {
        panic!("expected preview");
    };
    let PipelineResponse::ModificationPreview(b) = without_cache else {
        panic!("expected preview");
    };
    assert_eq!(a.modifications, b.modifications);
    assert_eq!(a.explanation, b.explanation);
    assert_eq!(a.insights, b.insights);
}

// ============================================================================
// Search Path
// ============================================================================

#[tokio::test]
async fn test_search_requested_by_plan_feeds_generation() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        planning_json("History", "expand", true),
        // Summary call for retrieval.
        "Recent sample-return planning builds on two decades of rover traverses across Mars."
            .to_string(),
        generation_json(
            "History",
            "Recent planning work builds on rover traverses dating back to 1997.",
        ),
    ]));
    let search = Arc::new(CannedSearch(vec![SearchResult {
        title: "Sample return".to_string(),
        url: "https://space.example/msr".to_string(),
        content: "Mars sample return planning continues, building on Sojourner, Spirit, Opportunity, Curiosity, and Perseverance."
            .to_string(),
    }]));
    let response = Orchestrator::new(
        llm,
        search,
        Arc::new(NoopCacheBackend),
        Arc::new(EmptyHistory),
        PipelineConfig::default(),
    )
    .execute(request("update History with the latest missions", None))
    .await;

    let PipelineResponse::ModificationPreview(preview) = response else {
        panic!("expected preview");
    };
    assert!(preview.insights.used_search);
    assert_eq!(
        preview.insights.search_sources,
        vec!["https://space.example/msr".to_string()]
    );
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_empty_instruction_is_error_payload() {
    let response = orchestrator(Arc::new(FailingLlm))
        .execute(request("   ", None))
        .await;

    let PipelineResponse::Error(error) = response else {
        panic!("expected an error payload");
    };
    assert!(error.message.contains("instruction"));
}
