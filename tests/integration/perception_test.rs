//! Perception Integration Tests
//!
//! Intent classification, the scope ladder, and fuzzy title matching over
//! realistic instructions in both languages.

use copydesk::services::perceive;
use copydesk::{Intent, Scope};

use crate::common::mars_blocks;

// ============================================================================
// Scope Ladder Tests
// ============================================================================

#[test]
fn test_whole_article_scope_english_and_chinese() {
    let english = perceive("Please polish the whole article", &mars_blocks());
    assert_eq!(english.paragraph_analysis.scope, Scope::FullArticle);
    assert_eq!(english.confidence, 1.0);

    let chinese = perceive("帮我润色整个文章", &mars_blocks());
    assert_eq!(chinese.paragraph_analysis.scope, Scope::FullArticle);
    assert_eq!(chinese.confidence, 1.0);
}

#[test]
fn test_exact_title_yields_single_paragraph() {
    let result = perceive("Expand the History section with more detail", &mars_blocks());
    assert_eq!(result.paragraph_analysis.scope, Scope::SingleParagraph);
    assert_eq!(
        result.paragraph_analysis.target_titles,
        vec!["History".to_string()]
    );
}

#[test]
fn test_two_titles_with_conjunction() {
    let result = perceive("Tighten History and Future", &mars_blocks());
    assert_eq!(result.paragraph_analysis.scope, Scope::MultipleParagraphs);
    assert_eq!(result.paragraph_analysis.target_titles.len(), 2);
}

#[test]
fn test_ambiguous_instruction_confidence_below_ninety() {
    let result = perceive("fix whatever seems off", &mars_blocks());
    assert!(result.confidence < 0.9);
    assert_eq!(result.paragraph_analysis.scope, Scope::Unknown);
}

// ============================================================================
// Intent Classification Tests
// ============================================================================

#[test]
fn test_intent_classification_bilingual() {
    assert_eq!(
        perceive("delete the Future section", &mars_blocks()).intent,
        Intent::DeleteContent
    );
    assert_eq!(
        perceive("删除未来这一节", &mars_blocks()).intent,
        Intent::DeleteContent
    );
    assert_eq!(
        perceive("add a paragraph on rovers to History", &mars_blocks()).intent,
        Intent::AddContent
    );
    assert_eq!(
        perceive("fact check the History section", &mars_blocks()).intent,
        Intent::FactCheck
    );
}

#[test]
fn test_default_intent_is_modify() {
    let result = perceive("History could use work", &mars_blocks());
    assert_eq!(result.intent, Intent::ModifyContent);
}

// ============================================================================
// Document Structure Passthrough
// ============================================================================

#[test]
fn test_perception_carries_document_structure() {
    let result = perceive("Expand the History section", &mars_blocks());
    assert_eq!(result.document_structure.sections.len(), 3);
    assert_eq!(
        result.document_structure.level2_titles(),
        vec!["History".to_string(), "Future".to_string()]
    );
}
