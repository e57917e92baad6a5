//! Perception Stage
//!
//! Classifies what the user wants and where in the document they want it.
//! Pure aside from calling the analyzer: an ordered bilingual keyword table
//! for intent, a priority ladder for scope, and fuzzy title matching against
//! the document's level-2 sections.

use tracing::debug;

use copydesk_core::{Block, DocumentStructure, Section};

use crate::models::stages::{Intent, ParagraphAnalysis, PerceptionResult, Scope};
use crate::services::analyzer;

/// Sections longer than this without subheadings get a subheading suggestion.
const SUBHEADING_WORD_THRESHOLD: usize = 300;

/// One intent classification rule. English and Chinese keyword lists are
/// checked together; no language detection happens at this stage.
struct IntentRule {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Ordered rule table. First match wins; no match defaults to modify.
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::ModifyContent,
        keywords: &[
            "modify", "change", "update", "edit", "rewrite", "修改", "更改", "改写", "重写", "调整",
        ],
    },
    IntentRule {
        intent: Intent::AddContent,
        keywords: &[
            "add", "append", "insert", "write a", "新增", "添加", "增加", "补充", "写一段",
        ],
    },
    IntentRule {
        intent: Intent::DeleteContent,
        keywords: &["delete", "remove", "drop the", "删除", "移除", "去掉"],
    },
    IntentRule {
        intent: Intent::ImproveWriting,
        keywords: &[
            "improve", "polish", "refine", "tighten", "润色", "优化", "改进", "通顺",
        ],
    },
    IntentRule {
        intent: Intent::FactCheck,
        keywords: &[
            "fact check", "fact-check", "verify", "is it true", "核实", "查证", "事实核查",
        ],
    },
    IntentRule {
        intent: Intent::Question,
        keywords: &[
            "what is", "what does", "why", "how does", "explain", "是什么", "为什么", "怎么",
        ],
    },
];

/// Phrases that unambiguously mean the whole article.
const FULL_ARTICLE_PHRASES: &[&str] = &[
    "whole article",
    "entire article",
    "full article",
    "whole document",
    "entire document",
    "整篇文章",
    "整个文章",
    "全文",
    "整篇",
];

/// Deictic phrases pointing at the current section.
const THIS_SECTION_PHRASES: &[&str] = &[
    "this section",
    "this paragraph",
    "current section",
    "这一段",
    "这一节",
    "这个部分",
    "本段",
];

/// Perceive an instruction against a document.
pub fn perceive(instruction: &str, blocks: &[Block]) -> PerceptionResult {
    let structure = analyzer::analyze(blocks);
    let instruction_lower = instruction.to_lowercase();

    let intent = classify_intent(&instruction_lower);
    let paragraph_analysis = detect_scope(&instruction_lower, instruction, &structure);
    let confidence = scope_confidence(&paragraph_analysis, &instruction_lower, &structure);
    let extracted_entities = extract_entities(instruction);

    debug!(
        %intent,
        scope = %paragraph_analysis.scope,
        confidence,
        targets = paragraph_analysis.target_titles.len(),
        "perception complete"
    );

    PerceptionResult {
        intent,
        confidence,
        document_structure: structure,
        extracted_entities,
        paragraph_analysis,
    }
}

/// First matching rule wins; the default intent is modify.
fn classify_intent(instruction_lower: &str) -> Intent {
    for rule in INTENT_RULES {
        if rule
            .keywords
            .iter()
            .any(|kw| instruction_lower.contains(kw))
        {
            return rule.intent;
        }
    }
    Intent::ModifyContent
}

/// Scope ladder, checked in priority order.
fn detect_scope(
    instruction_lower: &str,
    instruction: &str,
    structure: &DocumentStructure,
) -> ParagraphAnalysis {
    let level2: Vec<(usize, &Section)> = structure
        .sections
        .iter()
        .enumerate()
        .filter(|(_, s)| s.heading.as_ref().map(|h| h.level) == Some(2))
        .collect();

    // (a) Explicit whole-article phrasing.
    if FULL_ARTICLE_PHRASES
        .iter()
        .any(|p| instruction_lower.contains(p))
    {
        return ParagraphAnalysis {
            scope: Scope::FullArticle,
            target_titles: Vec::new(),
            target_indices: Vec::new(),
            needs_subheadings: false,
        };
    }

    // (b) A count phrase selects the first N level-2 sections.
    if let Some(count) = parse_count_phrase(instruction_lower) {
        if !level2.is_empty() {
            let picked: Vec<(usize, &Section)> = level2.iter().take(count).copied().collect();
            return ParagraphAnalysis {
                scope: Scope::MultipleParagraphs,
                target_titles: picked.iter().map(|(_, s)| s.title().to_string()).collect(),
                target_indices: picked.iter().map(|(i, _)| *i).collect(),
                needs_subheadings: false,
            };
        }
    }

    // (c)/(e) Fuzzy title matching against level-2 sections.
    let matched: Vec<(usize, &Section)> = level2
        .iter()
        .filter(|(_, s)| fuzzy_title_match(s.title(), instruction))
        .copied()
        .collect();

    // (c) A conjunction joining two or more matched titles.
    let has_conjunction = [" and ", "和", "与", "以及", "、"]
        .iter()
        .any(|c| instruction_lower.contains(c));
    if matched.len() >= 2 && has_conjunction {
        return ParagraphAnalysis {
            scope: Scope::MultipleParagraphs,
            target_titles: matched.iter().map(|(_, s)| s.title().to_string()).collect(),
            target_indices: matched.iter().map(|(i, _)| *i).collect(),
            needs_subheadings: false,
        };
    }

    // (d) Deictic reference to the current section.
    if THIS_SECTION_PHRASES
        .iter()
        .any(|p| instruction_lower.contains(p))
    {
        return ParagraphAnalysis {
            scope: Scope::SingleParagraph,
            target_titles: Vec::new(),
            target_indices: Vec::new(),
            needs_subheadings: false,
        };
    }

    // (e) Pure fuzzy matches.
    match matched.len() {
        1 => {
            let (index, section) = matched[0];
            ParagraphAnalysis {
                scope: Scope::SingleParagraph,
                target_titles: vec![section.title().to_string()],
                target_indices: vec![index],
                needs_subheadings: needs_subheadings(section),
            }
        }
        n if n >= 2 => ParagraphAnalysis {
            scope: Scope::MultipleParagraphs,
            target_titles: matched.iter().map(|(_, s)| s.title().to_string()).collect(),
            target_indices: matched.iter().map(|(i, _)| *i).collect(),
            needs_subheadings: false,
        },
        // (f) Nothing matched.
        _ => ParagraphAnalysis {
            scope: Scope::Unknown,
            target_titles: Vec::new(),
            target_indices: Vec::new(),
            needs_subheadings: false,
        },
    }
}

/// Confidence follows the ladder rung that produced the scope.
fn scope_confidence(
    analysis: &ParagraphAnalysis,
    instruction_lower: &str,
    structure: &DocumentStructure,
) -> f32 {
    match analysis.scope {
        Scope::FullArticle => 1.0,
        Scope::MultipleParagraphs => {
            if parse_count_phrase(instruction_lower).is_some()
                && !structure.level2_titles().is_empty()
            {
                0.9
            } else if [" and ", "和", "与", "以及", "、"]
                .iter()
                .any(|c| instruction_lower.contains(c))
            {
                0.85
            } else {
                0.7
            }
        }
        Scope::SingleParagraph => {
            if analysis.target_titles.is_empty() {
                // Deictic "this section" reference
                0.9
            } else {
                0.8
            }
        }
        Scope::Unknown => 0.5,
    }
}

/// Parse "three paragraphs" / "3 sections" / "三段" style count phrases.
fn parse_count_phrase(instruction_lower: &str) -> Option<usize> {
    const NOUNS: &[&str] = &["paragraph", "section", "段", "部分", "小节"];
    if !NOUNS.iter().any(|n| instruction_lower.contains(n)) {
        return None;
    }

    // English number words match whole tokens ("network" must not read as
    // "two"); Chinese numerals have no word boundaries to respect.
    const NUMBER_WORDS_EN: &[(&str, usize)] =
        &[("two", 2), ("three", 3), ("four", 4), ("five", 5), ("six", 6)];
    const NUMBER_WORDS_ZH: &[(&str, usize)] = &[
        ("两", 2),
        ("二", 2),
        ("三", 3),
        ("四", 4),
        ("五", 5),
        ("六", 6),
    ];
    let tokens: Vec<&str> = instruction_lower.split_whitespace().collect();
    for (word, value) in NUMBER_WORDS_EN {
        if tokens.contains(word) {
            return Some(*value);
        }
    }
    for (word, value) in NUMBER_WORDS_ZH {
        if instruction_lower.contains(word) {
            return Some(*value);
        }
    }
    for token in &tokens {
        if let Ok(value) = token.parse::<usize>() {
            if (2..=20).contains(&value) {
                return Some(value);
            }
        }
    }
    None
}

/// Fuzzy match between a section title and an instruction.
///
/// Substring containment either direction wins outright. Otherwise both
/// sides are tokenized into words longer than two characters and the title
/// must overlap the instruction in at least
/// `max(1, min(2, ceil(0.5 * title_words)))` words, where overlap means
/// mutual substring containment (tolerating inflection and compounding).
pub fn fuzzy_title_match(title: &str, instruction: &str) -> bool {
    if title.trim().is_empty() {
        return false;
    }
    let title_lower = title.to_lowercase();
    let instruction_lower = instruction.to_lowercase();
    if instruction_lower.contains(&title_lower) || title_lower.contains(instruction_lower.trim()) {
        return true;
    }

    let title_words = significant_words(&title_lower);
    let instruction_words = significant_words(&instruction_lower);
    if title_words.is_empty() || instruction_words.is_empty() {
        return false;
    }

    let required = ((title_words.len() as f32 * 0.5).ceil() as usize).clamp(1, 2);
    let overlap = title_words
        .iter()
        .filter(|tw| {
            instruction_words
                .iter()
                .any(|iw| tw.contains(iw.as_str()) || iw.contains(tw.as_str()))
        })
        .count();
    overlap >= required
}

fn significant_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// A section needs subheadings when it is long and has none.
///
/// Headings never appear in section content (they delimit sections), so
/// level-3 presence is read off the section heading's outline children.
fn needs_subheadings(section: &Section) -> bool {
    let has_sub = section
        .heading
        .as_ref()
        .is_some_and(|h| h.children.iter().any(|c| c.level == 3));
    !has_sub && section.word_count > SUBHEADING_WORD_THRESHOLD
}

/// Pull quoted phrases and capitalized runs out of the instruction.
fn extract_entities(instruction: &str) -> Vec<String> {
    let mut entities = Vec::new();

    // Quoted phrases, straight and curly quotes.
    for (open, close) in [('"', '"'), ('\u{201C}', '\u{201D}'), ('\u{300C}', '\u{300D}')] {
        let mut rest = instruction;
        while let Some(start) = rest.find(open) {
            let after = &rest[start + open.len_utf8()..];
            match after.find(close) {
                Some(end) => {
                    let quoted = after[..end].trim();
                    if !quoted.is_empty() {
                        entities.push(quoted.to_string());
                    }
                    rest = &after[end + close.len_utf8()..];
                }
                None => break,
            }
        }
    }

    // Runs of capitalized words (skipping the sentence-initial word).
    let words: Vec<&str> = instruction.split_whitespace().collect();
    let mut run: Vec<&str> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let clean = word.trim_matches(|c: char| !c.is_alphanumeric());
        let capitalized = clean.chars().next().is_some_and(|c| c.is_uppercase()) && clean.len() > 1;
        if capitalized && i > 0 {
            run.push(clean);
        } else {
            if !run.is_empty() {
                entities.push(run.join(" "));
                run.clear();
            }
        }
    }
    if !run.is_empty() {
        entities.push(run.join(" "));
    }

    entities.dedup();
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mars_blocks() -> Vec<Block> {
        vec![
            Block::heading(1, "Mars"),
            Block::heading(2, "History"),
            Block::paragraph("Exploration since the 1960s."),
            Block::heading(2, "Future"),
            Block::paragraph("Starship may land crews."),
        ]
    }

    #[test]
    fn test_full_article_scope_bilingual() {
        for instruction in ["Polish the whole article please", "帮我润色整篇文章"] {
            let result = perceive(instruction, &mars_blocks());
            assert_eq!(result.paragraph_analysis.scope, Scope::FullArticle);
            assert_eq!(result.confidence, 1.0);
        }
    }

    #[test]
    fn test_exact_title_single_paragraph() {
        let result = perceive("Expand the History section", &mars_blocks());
        assert_eq!(result.paragraph_analysis.scope, Scope::SingleParagraph);
        assert_eq!(
            result.paragraph_analysis.target_titles,
            vec!["History".to_string()]
        );
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_conjunction_of_titles_multiple_paragraphs() {
        let result = perceive("Rewrite History and Future", &mars_blocks());
        assert_eq!(result.paragraph_analysis.scope, Scope::MultipleParagraphs);
        assert_eq!(result.paragraph_analysis.target_titles.len(), 2);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_count_phrase_selects_first_sections() {
        let result = perceive("improve the first two sections", &mars_blocks());
        assert_eq!(result.paragraph_analysis.scope, Scope::MultipleParagraphs);
        assert_eq!(result.paragraph_analysis.target_titles.len(), 2);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_deictic_this_section() {
        let result = perceive("make this section punchier", &mars_blocks());
        assert_eq!(result.paragraph_analysis.scope, Scope::SingleParagraph);
        assert!(result.paragraph_analysis.target_titles.is_empty());
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_ambiguous_instruction_low_confidence() {
        let result = perceive("hmm maybe something somewhere", &mars_blocks());
        assert_eq!(result.paragraph_analysis.scope, Scope::Unknown);
        assert!(result.confidence < 0.9);
    }

    #[test]
    fn test_intent_rules_ordered() {
        assert_eq!(classify_intent("please delete the intro"), Intent::DeleteContent);
        assert_eq!(classify_intent("添加一段关于火箭的内容"), Intent::AddContent);
        assert_eq!(classify_intent("polish the tone"), Intent::ImproveWriting);
        assert_eq!(classify_intent("nothing matches here"), Intent::ModifyContent);
    }

    #[test]
    fn test_fuzzy_match_substring() {
        assert!(fuzzy_title_match("History", "expand the history section"));
        assert!(fuzzy_title_match("Getting Started Guide", "update the getting started part"));
    }

    #[test]
    fn test_fuzzy_match_word_overlap_threshold() {
        // Three significant words -> requires min(2, ceil(1.5)) = 2 overlaps.
        assert!(fuzzy_title_match(
            "Deployment Pipeline Overview",
            "tighten the deployment overview text"
        ));
        assert!(!fuzzy_title_match(
            "Deployment Pipeline Overview",
            "tighten the deployment text"
        ));
    }

    #[test]
    fn test_fuzzy_match_inflection_tolerant() {
        assert!(fuzzy_title_match("Deployments", "document the deployment flow"));
    }

    #[test]
    fn test_needs_subheadings_threshold() {
        let long_body = vec!["word"; 301].join(" ");
        let blocks = vec![
            Block::heading(2, "History"),
            Block::paragraph(long_body),
        ];
        let result = perceive("expand the History section", &blocks);
        assert!(result.paragraph_analysis.needs_subheadings);

        let blocks_with_sub = vec![
            Block::heading(2, "History"),
            Block::heading(3, "Early days"),
            Block::paragraph(vec!["word"; 301].join(" ")),
        ];
        let result = perceive("expand the History section", &blocks_with_sub);
        assert!(!result.paragraph_analysis.needs_subheadings);
    }

    #[test]
    fn test_extract_entities_quoted_and_capitalized() {
        let entities = extract_entities("Add a note about \"orbital mechanics\" to the Mars Rover part");
        assert!(entities.contains(&"orbital mechanics".to_string()));
        assert!(entities.contains(&"Mars Rover".to_string()));
    }
}
