//! Prompt Builders
//!
//! System and user prompts for the planning, retrieval, and generation
//! stages. Format contracts are stated in both English and Chinese; the
//! pipeline serves bilingual instructions and the models follow the mirrored
//! wording more reliably.

use copydesk_core::{DocumentStructure, OutlineNode, WritingStyleProfile};

use crate::models::stages::{PerceptionResult, PlanningResult};
use crate::utils::language::Language;

/// System prompt for the planning call. The response MUST be one JSON object.
pub fn planning_system_prompt() -> String {
    r#"You are an editorial planner for a document editor. Given a user instruction and a document outline, decide what single edit action to take.

Respond with EXACTLY ONE JSON object in this shape (no other JSON objects, no commentary before the opening brace):
请只输出一个符合以下格式的 JSON 对象（不要在大括号前输出其他内容）：

{
  "thoughtProcess": "one short paragraph of reasoning",
  "targetLocation": {"sectionTitle": "exact section title or null"},
  "actionPlan": {"type": "expand|rewrite|insert|delete", "estimatedWords": 300},
  "needsSearch": false,
  "searchQueries": ["query one"],
  "clarificationNeeded": false,
  "clarificationQuestions": [],
  "suggestions": []
}

Rules / 规则:
- "type" must be one of expand, rewrite, insert, delete
- Set "needsSearch" true only when the instruction needs fresh external facts / 仅当需要最新外部资料时设为 true
- Set "clarificationNeeded" true only when no target section can be resolved / 仅当无法确定目标章节时设为 true
- Keep "estimatedWords" realistic for the action"#
        .to_string()
}

/// User prompt for the planning call.
pub fn planning_user_prompt(instruction: &str, perception: &PerceptionResult) -> String {
    format!(
        "Instruction:\n{instruction}\n\nDocument outline:\n{outline}\n\nPerceived intent: {intent} (confidence {confidence:.2})\nPerceived scope: {scope}\nMatched sections: {titles}\n",
        instruction = instruction,
        outline = outline_summary(&perception.document_structure),
        intent = perception.intent,
        confidence = perception.confidence,
        scope = perception.paragraph_analysis.scope,
        titles = if perception.paragraph_analysis.target_titles.is_empty() {
            "(none)".to_string()
        } else {
            perception.paragraph_analysis.target_titles.join(", ")
        },
    )
}

/// System prompt for summarizing search results.
pub fn summary_system_prompt() -> String {
    "You summarize web search results for an editor. Write one tight paragraph of the key facts, with no preamble and no bullet points. Keep concrete numbers and dates. / 请将搜索结果概括为一段紧凑的事实摘要，保留具体数字和日期。"
        .to_string()
}

/// User prompt for summarizing search results.
pub fn summary_user_prompt(results_text: &str) -> String {
    format!("Search results:\n\n{}\n\nSummarize the facts relevant to an article editor.", results_text)
}

/// System prompt for structured generation. Embeds the style profile and the
/// JSON contract.
pub fn generation_system_prompt(
    style: Option<&WritingStyleProfile>,
    language: Language,
) -> String {
    let language_line = match language {
        Language::Zh => "Write the content in Chinese. / 请用中文撰写内容。",
        Language::En => "Write the content in English.",
    };
    let style_block = style.map(style_fingerprint).unwrap_or_default();

    format!(
        r#"You are a document editor producing block-level edits.
{language_line}
{style_block}
Respond with EXACTLY ONE JSON object:
请只输出一个 JSON 对象：

{{
  "modifications": [
    {{"type": "append|insert|replace|replace_paragraph|delete|update_title|add_section", "target": "section title or null", "content": "markdown content"}}
  ],
  "explanation": "one sentence describing the edit"
}}

Content rules / 内容规则:
- Use ## for section headings and ### for subheadings
- Separate paragraphs with blank lines
- "content" may be omitted only for delete"#,
    )
}

/// Render a style profile as prompt guidance lines.
fn style_fingerprint(style: &WritingStyleProfile) -> String {
    let mut lines = vec![format!(
        "Match the author's style: about {:.0} words per sentence, formality {}/10, prefers {} structure.",
        style.avg_sentence_length, style.formality_level, style.preferred_structure
    )];
    if !style.common_phrases.is_empty() {
        lines.push(format!(
            "The author often uses phrases like: {}.",
            style.common_phrases.join(", ")
        ));
    }
    if style.uses_examples {
        lines.push("Illustrate key points with a concrete example.".to_string());
    }
    lines.join("\n")
}

/// User prompt for structured generation.
pub fn generation_user_prompt(
    instruction: &str,
    planning: &PlanningResult,
    section_text: &str,
    search_summary: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Instruction:\n{}\n\nPlanned action: {} (~{} words)\nTarget section: {}\n",
        instruction,
        planning.action_plan.action_type,
        planning.action_plan.estimated_words,
        planning
            .target_location
            .section_title
            .as_deref()
            .unwrap_or("(whole document)"),
    );
    if !section_text.is_empty() {
        prompt.push_str(&format!("\nCurrent section content:\n{}\n", section_text));
    }
    if let Some(summary) = search_summary {
        prompt.push_str(&format!("\nResearch notes:\n{}\n", summary));
    }
    prompt
}

/// System prompt for the plain-text generation fallback. No JSON wrapper.
pub fn plain_system_prompt(language: Language) -> String {
    match language {
        Language::Zh => "你是一位文档编辑。直接输出要插入文档的正文内容，不要输出 JSON、代码块或任何解释。".to_string(),
        Language::En => "You are a document editor. Output ONLY the prose to place in the document. No JSON, no code fences, no commentary.".to_string(),
    }
}

/// Minimal-context retry prompt for the plain-text fallback.
pub fn plain_minimal_prompt(instruction: &str) -> String {
    format!("Write the document content requested by this instruction:\n{}", instruction)
}

/// One-line-per-heading outline rendering.
pub fn outline_summary(structure: &DocumentStructure) -> String {
    fn walk(nodes: &[OutlineNode], out: &mut String) {
        for node in nodes {
            out.push_str(&format!(
                "{} {}\n",
                "#".repeat(node.level as usize),
                node.title
            ));
            walk(&node.children, out);
        }
    }
    if structure.outline.is_empty() {
        return "(no headings)".to_string();
    }
    let mut out = String::new();
    walk(&structure.outline, &mut out);
    out
}
