//! Planning Integration Tests
//!
//! The LLM planning contract, JSON recovery from messy responses, and the
//! rule-based fallback planner.

use copydesk::services::{perceive, planner};
use copydesk::{ActionType, PipelineConfig};

use crate::common::{mars_blocks, planning_json, FailingLlm, ScriptedLlm};

#[tokio::test]
async fn test_planning_accepts_fenced_json() {
    let response = format!("Sure!\n```json\n{}\n```", planning_json("History", "expand", false));
    let perception = perceive("Expand the History section", &mars_blocks());
    let planning = planner::plan(
        &ScriptedLlm::new(vec![response]),
        &perception,
        "Expand the History section",
        &PipelineConfig::default(),
    )
    .await;

    assert_eq!(planning.action_plan.action_type, ActionType::Expand);
    assert_eq!(
        planning.target_location.section_title.as_deref(),
        Some("History")
    );
    assert!(!planning.needs_search);
}

#[tokio::test]
async fn test_planning_accepts_prose_wrapped_json() {
    let response = format!(
        "Let me think about this. {} Does that work?",
        planning_json("Future", "rewrite", true)
    );
    let perception = perceive("rewrite the Future section", &mars_blocks());
    let planning = planner::plan(
        &ScriptedLlm::new(vec![response]),
        &perception,
        "rewrite the Future section",
        &PipelineConfig::default(),
    )
    .await;

    assert_eq!(planning.action_plan.action_type, ActionType::Rewrite);
    assert!(planning.needs_search);
    assert_eq!(planning.search_queries, vec!["Future facts".to_string()]);
}

#[tokio::test]
async fn test_invalid_action_type_triggers_fallback() {
    // "type" outside the enum fails validation, not just parsing.
    let response = r#"{"actionPlan": {"type": "summon", "estimatedWords": 10}}"#;
    let perception = perceive("Expand the History section", &mars_blocks());
    let planning = planner::plan(
        &ScriptedLlm::new(vec![response.to_string()]),
        &perception,
        "Expand the History section",
        &PipelineConfig::default(),
    )
    .await;

    // Rule-based fallback: modify intent with a resolved target maps to expand.
    assert_eq!(planning.action_plan.action_type, ActionType::Expand);
    assert_eq!(
        planning.target_location.section_title.as_deref(),
        Some("History")
    );
}

#[tokio::test]
async fn test_llm_failure_uses_rule_based_plan() {
    let perception = perceive("delete the Future section", &mars_blocks());
    let planning = planner::plan(
        &FailingLlm,
        &perception,
        "delete the Future section",
        &PipelineConfig::default(),
    )
    .await;

    assert_eq!(planning.action_plan.action_type, ActionType::Delete);
    assert!(!planning.clarification_needed);
}

#[tokio::test]
async fn test_fallback_requests_clarification_without_target() {
    let perception = perceive("make it sparkle", &mars_blocks());
    let planning = planner::plan(
        &FailingLlm,
        &perception,
        "make it sparkle",
        &PipelineConfig::default(),
    )
    .await;

    assert!(planning.clarification_needed);
    assert!(!planning.clarification_questions.is_empty());
}

#[tokio::test]
async fn test_fallback_flags_search_on_timeliness_cues() {
    let perception = perceive("update History with the latest missions", &mars_blocks());
    let planning = planner::plan(
        &FailingLlm,
        &perception,
        "update History with the latest missions",
        &PipelineConfig::default(),
    )
    .await;

    assert!(planning.needs_search);
    assert!(planning.search_queries[0].contains("History"));
}
