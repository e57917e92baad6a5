//! Planning Stage
//!
//! Turns perception output into a concrete action: target location, action
//! type, word budget, search need. Primary path is one LLM call with a strict
//! JSON contract; any LLM or parse failure falls back to a deterministic
//! rule-based planner, so planning itself never fails.

use tracing::{debug, warn};

use copydesk_core::{json_scan, Section};
use copydesk_llm::LlmClient;

use crate::config::PipelineConfig;
use crate::models::stages::{
    ActionPlan, ActionType, Intent, PerceptionResult, PlanningResult, Scope, TargetLocation,
};
use crate::services::prompts;

/// Cues that mean the instruction wants fresh external facts.
const SEARCH_CUES: &[&str] = &[
    "latest", "recent", "current", "today", "this year", "search", "look up", "2025", "2026",
    "最新", "近期", "当前", "今年", "搜索", "查一下", "查询",
];

/// Explicit rewrite phrasing overrides the intent mapping.
const REWRITE_CUES: &[&str] = &["rewrite", "rework", "redo", "重写", "改写"];

/// Plan an edit for the instruction.
pub async fn plan(
    llm: &dyn LlmClient,
    perception: &PerceptionResult,
    instruction: &str,
    config: &PipelineConfig,
) -> PlanningResult {
    let system = prompts::planning_system_prompt();
    let user = prompts::planning_user_prompt(instruction, perception);

    match llm.complete(&system, &user).await {
        Ok(response) => match parse_planning_response(&response) {
            Ok(planning) => {
                debug!(action = %planning.action_plan.action_type, "planning via model");
                planning
            }
            Err(e) => {
                warn!(error = %e, "planning response unusable; using rule-based plan");
                rule_based_plan(perception, instruction, config)
            }
        },
        Err(e) => {
            warn!(error = %e, "planning call failed; using rule-based plan");
            rule_based_plan(perception, instruction, config)
        }
    }
}

/// Extract and validate the planning JSON contract.
fn parse_planning_response(response: &str) -> Result<PlanningResult, copydesk_core::CoreError> {
    let value = json_scan::parse_json_object(response)?;
    let planning: PlanningResult = serde_json::from_value(value)?;
    Ok(planning)
}

/// Deterministic fallback planner.
///
/// Locates the target from perception's matched titles, maps intent to an
/// action, flags search on timeliness cues, and requests clarification iff no
/// target was resolved and the scope is not the whole article.
pub fn rule_based_plan(
    perception: &PerceptionResult,
    instruction: &str,
    config: &PipelineConfig,
) -> PlanningResult {
    let analysis = &perception.paragraph_analysis;
    let instruction_lower = instruction.to_lowercase();

    let target_section: Option<(usize, &Section)> = analysis
        .target_indices
        .first()
        .and_then(|&i| perception.document_structure.sections.get(i).map(|s| (i, s)));

    let action_type = if REWRITE_CUES.iter().any(|c| instruction_lower.contains(c)) {
        ActionType::Rewrite
    } else {
        match perception.intent {
            Intent::DeleteContent => ActionType::Delete,
            Intent::AddContent => ActionType::Insert,
            _ => ActionType::Expand,
        }
    };

    let estimated_words = match action_type {
        ActionType::Delete => 0,
        ActionType::Rewrite => target_section
            .map(|(_, s)| s.word_count.max(config.default_target_words / 2))
            .unwrap_or(config.default_target_words),
        _ => config.default_target_words,
    };

    let needs_search = SEARCH_CUES.iter().any(|c| instruction_lower.contains(c));
    let search_queries = if needs_search {
        let mut query = String::new();
        if let Some((_, section)) = target_section {
            query.push_str(section.title());
            query.push(' ');
        }
        query.push_str(instruction.trim());
        vec![query.trim().to_string()]
    } else {
        Vec::new()
    };

    let clarification_needed =
        target_section.is_none() && analysis.scope != Scope::FullArticle;
    let clarification_questions = if clarification_needed {
        vec![
            "Which section should this apply to? / 请问要修改哪个章节？".to_string(),
        ]
    } else {
        Vec::new()
    };

    let mut suggestions = Vec::new();
    if analysis.needs_subheadings {
        suggestions
            .push("The target section is long; consider adding subheadings.".to_string());
    }

    PlanningResult {
        thought_process: format!(
            "Rule-based plan: intent {} with scope {} maps to {}.",
            perception.intent, analysis.scope, action_type
        ),
        target_location: TargetLocation {
            section_title: target_section.map(|(_, s)| s.title().to_string()),
            section_index: target_section.map(|(i, _)| i),
        },
        action_plan: ActionPlan {
            action_type,
            estimated_words,
        },
        needs_search,
        search_queries,
        clarification_needed,
        clarification_questions,
        suggestions,
    }
}
