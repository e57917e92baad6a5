//! Generation Stage
//!
//! Produces the actual replacement/insertion content through an ordered list
//! of strategies, each stricter about failure than the last:
//!
//! 1. Structured mode: one LLM call with a JSON contract and the style profile
//! 2. Plain-text mode: raw prose with a minimal-context retry, title synthesis
//! 3. Safety net: search-material synthesis or a fixed bilingual apology
//!
//! Tier 3 returns `GenerationResult` directly (no error variant), so the
//! cascade cannot exhaust: generation never fails.

use serde::Deserialize;
use tracing::{debug, warn};

use copydesk_core::{
    json_scan, Block, GenerationResult, Modification, ModificationType, WritingStyleProfile,
};
use copydesk_llm::LlmClient;
use copydesk_scoring::diff_stats;

use crate::config::PipelineConfig;
use crate::models::stages::{ActionType, PlanningResult, SearchContext};
use crate::services::prompts;
use crate::utils::language::{detect_language, Language};

/// Built-in safety-net apology. `{section}` is replaced with the target title.
const DEFAULT_APOLOGY_TEMPLATE: &str = "We could not generate new content for \"{section}\" because the language model is temporarily unavailable. Please try again in a moment.\n\n由于语言模型暂时不可用，无法为「{section}」生成新内容，请稍后重试。";

/// Connector words stripped when synthesizing a title from an instruction.
const TITLE_STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "of", "for", "about", "on", "in", "please", "add", "write", "section",
    "paragraph", "content", "some", "new",
];

/// One failed generation tier.
#[derive(Debug)]
struct TierFailure {
    tier: &'static str,
    message: String,
}

impl TierFailure {
    fn new(tier: &'static str, message: impl Into<String>) -> Self {
        Self {
            tier,
            message: message.into(),
        }
    }
}

/// Generate the edit content for a plan. Never fails.
pub async fn generate(
    llm: &dyn LlmClient,
    planning: &PlanningResult,
    search_context: Option<&SearchContext>,
    blocks: &[Block],
    instruction: &str,
    style: Option<&WritingStyleProfile>,
    config: &PipelineConfig,
) -> GenerationResult {
    let language = detect_language(instruction);
    let old_text = target_section_text(planning, blocks);

    match structured_attempt(llm, planning, search_context, &old_text, instruction, style, language, config).await
    {
        Ok(result) => {
            debug!(tier = "structured", "generation complete");
            return result;
        }
        Err(failure) => {
            warn!(tier = failure.tier, error = %failure.message, "generation tier failed; escalating");
        }
    }

    match plain_text_attempt(llm, planning, search_context, &old_text, instruction, language, config)
        .await
    {
        Ok(result) => {
            debug!(tier = "plain_text", "generation complete");
            return result;
        }
        Err(failure) => {
            warn!(tier = failure.tier, error = %failure.message, "generation tier failed; escalating");
        }
    }

    debug!(tier = "safety_net", "generation via safety net");
    safety_net(planning, search_context, instruction, &old_text, language, config)
}

/// Wire shape of the structured-mode response.
#[derive(Debug, Deserialize)]
struct StructuredResponse {
    modifications: Vec<WireModification>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireModification {
    #[serde(rename = "type")]
    modification_type: ModificationType,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    position: Option<usize>,
    #[serde(default)]
    paragraph_index: Option<usize>,
}

/// Tier 1: structured JSON call.
#[allow(clippy::too_many_arguments)]
async fn structured_attempt(
    llm: &dyn LlmClient,
    planning: &PlanningResult,
    search_context: Option<&SearchContext>,
    old_text: &str,
    instruction: &str,
    style: Option<&WritingStyleProfile>,
    language: Language,
    config: &PipelineConfig,
) -> Result<GenerationResult, TierFailure> {
    let system = prompts::generation_system_prompt(style, language);
    let user = prompts::generation_user_prompt(
        instruction,
        planning,
        old_text,
        search_context.map(|c| c.summary.as_str()),
    );

    let response = llm
        .complete(&system, &user)
        .await
        .map_err(|e| TierFailure::new("structured", e.to_string()))?;

    let value = json_scan::parse_json_object(&response)
        .map_err(|e| TierFailure::new("structured", e.to_string()))?;
    let parsed: StructuredResponse = serde_json::from_value(value)
        .map_err(|e| TierFailure::new("structured", e.to_string()))?;

    let modifications: Vec<Modification> = parsed
        .modifications
        .into_iter()
        .map(|m| Modification {
            modification_type: m.modification_type,
            content: m.content,
            target: m.target.or_else(|| planning.target_location.section_title.clone()),
            position: m.position,
            paragraph_index: m.paragraph_index,
        })
        .filter(|m| {
            m.modification_type == ModificationType::Delete
                || m.content
                    .as_deref()
                    .is_some_and(|c| c.chars().count() >= config.min_content_chars)
        })
        .collect();

    if modifications.is_empty() {
        return Err(TierFailure::new(
            "structured",
            "response contained no usable modifications",
        ));
    }

    let explanation = if parsed.explanation.is_empty() {
        default_explanation(planning, language)
    } else {
        parsed.explanation
    };

    Ok(finish(modifications, explanation, old_text))
}

/// Tier 2: plain prose, with a minimal-context retry.
async fn plain_text_attempt(
    llm: &dyn LlmClient,
    planning: &PlanningResult,
    search_context: Option<&SearchContext>,
    old_text: &str,
    instruction: &str,
    language: Language,
    config: &PipelineConfig,
) -> Result<GenerationResult, TierFailure> {
    let system = prompts::plain_system_prompt(language);
    let user = prompts::generation_user_prompt(
        instruction,
        planning,
        old_text,
        search_context.map(|c| c.summary.as_str()),
    );

    let mut content = match llm.complete(&system, &user).await {
        Ok(text) => strip_json_remnants(&text),
        Err(e) => {
            debug!(error = %e, "full-context plain call failed; retrying minimal");
            String::new()
        }
    };

    // Minimal-context retry when the first pass came back too thin.
    if content.chars().count() < config.min_content_chars {
        let retry = llm
            .complete(&system, &prompts::plain_minimal_prompt(instruction))
            .await
            .map_err(|e| TierFailure::new("plain_text", e.to_string()))?;
        content = strip_json_remnants(&retry);
    }

    if content.chars().count() < config.min_content_chars {
        return Err(TierFailure::new(
            "plain_text",
            "no attempt produced enough content",
        ));
    }

    // Prose mode never carries a heading of its own; synthesize one.
    if !content.trim_start().starts_with('#') {
        let title = synthesize_title(instruction, language);
        content = format!("## {}\n\n{}", title, content);
    }

    let modification = modification_for_action(planning, content);
    Ok(finish(
        vec![modification],
        default_explanation(planning, language),
        old_text,
    ))
}

/// Tier 3: always succeeds.
fn safety_net(
    planning: &PlanningResult,
    search_context: Option<&SearchContext>,
    instruction: &str,
    old_text: &str,
    language: Language,
    config: &PipelineConfig,
) -> GenerationResult {
    let section_name = planning
        .target_location
        .section_title
        .clone()
        .unwrap_or_else(|| synthesize_title(instruction, language));

    let usable = search_context
        .filter(|c| c.has_usable_content(config.min_summary_chars));

    let (content, explanation) = match usable {
        Some(context) => {
            let body = if context.is_unavailable() || context.summary.chars().count() < config.min_summary_chars {
                raw_results_digest(context, config)
            } else {
                context.summary.clone()
            };
            let mut content = format!("## {}\n\n{}", section_name, body);
            if !context.sources.is_empty() {
                content.push_str("\n\nSources / 来源:\n");
                for source in &context.sources {
                    content.push_str(&format!("- {}\n", source));
                }
            }
            (
                content,
                "Drafted from web search results; the language model was unavailable."
                    .to_string(),
            )
        }
        None => {
            let template = config
                .apology_template
                .as_deref()
                .unwrap_or(DEFAULT_APOLOGY_TEMPLATE);
            let body = template.replace("{section}", &section_name);
            (
                format!("## {}\n\n{}", section_name, body),
                "The language model and web search were unavailable; returned a placeholder."
                    .to_string(),
            )
        }
    };

    let modification = modification_for_action(planning, content);
    finish(vec![modification], explanation, old_text)
}

/// Fold raw search results into a plain digest.
fn raw_results_digest(context: &SearchContext, config: &PipelineConfig) -> String {
    context
        .raw_results
        .iter()
        .take(3)
        .map(|r| {
            let cleaned: String = r
                .content
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .chars()
                .take(config.fallback_summary_chars)
                .collect();
            format!("{}: {}", r.title, cleaned)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Map the planned action to a modification shape.
fn modification_for_action(planning: &PlanningResult, content: String) -> Modification {
    let target = planning.target_location.section_title.clone();
    match planning.action_plan.action_type {
        ActionType::Delete => match target {
            Some(t) => Modification::delete(t),
            None => Modification::delete(""),
        },
        ActionType::Rewrite => match target {
            Some(t) => Modification::replace(t, content),
            None => Modification::add_section(content),
        },
        ActionType::Insert => Modification::add_section(content),
        ActionType::Expand => Modification::append(target, content),
    }
}

/// Shared post-processing: compute diff statistics against the old text.
fn finish(
    modifications: Vec<Modification>,
    explanation: String,
    old_text: &str,
) -> GenerationResult {
    let new_text: String = modifications
        .iter()
        .filter_map(|m| m.content.as_deref())
        .collect::<Vec<_>>()
        .join("\n\n");

    // Appends extend the old text rather than replacing it.
    let changes_summary = if modifications
        .iter()
        .all(|m| m.modification_type == ModificationType::Append
            || m.modification_type == ModificationType::Insert
            || m.modification_type == ModificationType::AddSection)
    {
        let combined = format!("{}\n\n{}", old_text, new_text);
        diff_stats(old_text, &combined)
    } else {
        diff_stats(old_text, &new_text)
    };

    GenerationResult {
        modifications,
        explanation,
        changes_summary,
    }
}

/// The target section's current text, for context and diffing.
fn target_section_text(planning: &PlanningResult, blocks: &[Block]) -> String {
    let Some(title) = planning.target_location.section_title.as_deref() else {
        return String::new();
    };
    let mut inside = false;
    let mut target_level = 0u8;
    let mut out: Vec<String> = Vec::new();
    for block in blocks {
        match block.heading_level() {
            Some(level) => {
                if inside && level <= target_level {
                    break;
                }
                if block.plain_text() == title {
                    inside = true;
                    target_level = level;
                }
            }
            None => {
                if inside {
                    let text = block.plain_text();
                    if !text.is_empty() {
                        out.push(text);
                    }
                }
            }
        }
    }
    out.join("\n\n")
}

/// Synthesize a section title from the instruction.
///
/// Pattern-matches "about X" / "关于X的" phrasing; otherwise strips connector
/// words and keeps the first few meaningful ones.
fn synthesize_title(instruction: &str, language: Language) -> String {
    if let Some(idx) = instruction.find("关于") {
        let after = &instruction[idx + "关于".len()..];
        let end = after.find('的').unwrap_or(after.len());
        let candidate = after[..end].trim();
        if !candidate.is_empty() {
            return candidate.to_string();
        }
    }

    let lower = instruction.to_lowercase();
    if let Some(idx) = lower.find("about ") {
        let after = &instruction[idx + "about ".len()..];
        let end = after
            .find(['.', ',', '!', '?', '。', '，'])
            .unwrap_or(after.len());
        let candidate = after[..end].trim();
        if !candidate.is_empty() {
            return candidate.to_string();
        }
    }

    let kept: Vec<&str> = instruction
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .filter(|w| !TITLE_STOPWORDS.contains(&w.to_lowercase().as_str()))
        .take(6)
        .collect();
    if kept.is_empty() {
        match language {
            Language::Zh => "新章节".to_string(),
            Language::En => "New Section".to_string(),
        }
    } else {
        kept.join(" ")
    }
}

/// Strip code fences and JSON wrappers a model slipped into prose output.
fn strip_json_remnants(text: &str) -> String {
    let mut cleaned = text.trim();

    // Drop a wrapping code fence.
    if cleaned.starts_with("```") {
        if let Some(first_newline) = cleaned.find('\n') {
            cleaned = &cleaned[first_newline + 1..];
        }
        if let Some(end) = cleaned.rfind("```") {
            cleaned = &cleaned[..end];
        }
    }
    let cleaned = cleaned.trim();

    // A stray JSON object: prefer its "content" field if it has one.
    if cleaned.starts_with('{') {
        if let Ok(value) = json_scan::parse_json_object(cleaned) {
            if let Some(content) = value.get("content").and_then(|c| c.as_str()) {
                return content.trim().to_string();
            }
        }
    }

    cleaned.to_string()
}

fn default_explanation(planning: &PlanningResult, language: Language) -> String {
    let target = planning
        .target_location
        .section_title
        .as_deref()
        .unwrap_or("the document");
    match language {
        Language::Zh => format!(
            "已按照计划对「{}」执行 {} 操作。",
            target, planning.action_plan.action_type
        ),
        Language::En => format!(
            "Applied a {} edit to {}.",
            planning.action_plan.action_type, target
        ),
    }
}
