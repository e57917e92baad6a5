//! Document Analyzer Integration Tests
//!
//! Verifies the analyzer's structural properties through the public API:
//! outline nesting, section partitioning, and statistics.

use copydesk::services::analyze;
use copydesk_core::{Block, DocumentStats};

use crate::common::mars_blocks;

// ============================================================================
// Outline Construction Tests
// ============================================================================

#[test]
fn test_no_headings_empty_outline_single_section() {
    let blocks = vec![
        Block::paragraph("first paragraph here"),
        Block::bullet_item("a list item"),
        Block::paragraph("closing paragraph"),
    ];
    let structure = analyze(&blocks);

    assert!(structure.outline.is_empty());
    assert_eq!(structure.sections.len(), 1);
    assert!(structure.sections[0].heading.is_none());
    assert_eq!(structure.sections[0].content.len(), 3);
}

#[test]
fn test_full_level_chain_nests_to_depth_six() {
    let blocks: Vec<Block> = (1..=6u8)
        .map(|level| Block::heading(level, format!("Level {}", level)))
        .collect();
    let structure = analyze(&blocks);

    assert_eq!(structure.outline.len(), 1);
    assert_eq!(structure.outline[0].depth(), 6);

    // Each node has exactly one child until the leaf.
    let mut node = &structure.outline[0];
    for expected_level in 2..=6u8 {
        assert_eq!(node.children.len(), 1);
        node = &node.children[0];
        assert_eq!(node.level, expected_level);
    }
    assert!(node.children.is_empty());
}

#[test]
fn test_sibling_headings_stay_siblings() {
    let structure = analyze(&mars_blocks());
    assert_eq!(structure.outline.len(), 1);
    let mars = &structure.outline[0];
    assert_eq!(mars.title, "Mars");
    assert_eq!(mars.children.len(), 2);
    assert_eq!(mars.children[0].title, "History");
    assert_eq!(mars.children[1].title, "Future");
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[test]
fn test_empty_document_all_stats_zero() {
    let structure = analyze(&[]);
    assert_eq!(
        structure.stats,
        DocumentStats {
            total_words: 0,
            total_paragraphs: 0,
            total_headings: 0,
            reading_time_minutes: 0,
            avg_sentence_length: 0.0,
        }
    );
    assert!(structure.outline.is_empty());
    assert!(structure.sections.is_empty());
}

#[test]
fn test_reading_time_is_ceiling_of_words_over_200() {
    let words = vec!["word"; 400].join(" ");
    let structure = analyze(&[Block::paragraph(words)]);
    assert_eq!(structure.stats.total_words, 400);
    assert_eq!(structure.stats.reading_time_minutes, 2);
}

#[test]
fn test_section_words_account_for_total() {
    let structure = analyze(&mars_blocks());
    let section_words: usize = structure.sections.iter().map(|s| s.word_count).sum();
    let heading_words: usize = mars_blocks()
        .iter()
        .filter(|b| b.is_heading())
        .map(|b| b.word_count())
        .sum();
    assert_eq!(section_words + heading_words, structure.stats.total_words);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_analysis_is_deterministic() {
    let blocks = mars_blocks();
    assert_eq!(analyze(&blocks), analyze(&blocks));
}
