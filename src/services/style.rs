//! Style Profiler
//!
//! Derives a writing-style fingerprint from a user's recent documents. A
//! missing or empty history degrades to the default profile, never an error.

use std::collections::HashMap;

use tracing::{debug, warn};

use copydesk_core::{Block, BlockKind, HistoryStore, PreferredStructure, WritingStyleProfile};

/// Formal connectors nudge formality up.
const FORMAL_CUES: &[&str] = &[
    "therefore",
    "moreover",
    "furthermore",
    "consequently",
    "accordingly",
    "in conclusion",
    "因此",
    "然而",
    "综上所述",
    "此外",
];

/// Casual markers nudge formality down.
const CASUAL_CUES: &[&str] = &[
    "gonna", "kinda", "stuff", "btw", "lol", "!!", "哈哈", "啦", "呗", "嘛",
];

/// Phrases that signal the author illustrates with examples.
const EXAMPLE_CUES: &[&str] = &[
    "for example",
    "for instance",
    "e.g.",
    "such as",
    "例如",
    "比如",
    "举个例子",
];

/// Derive a user's style profile from their recent documents.
///
/// Store failures and empty histories both return the default profile.
pub async fn derive_profile(
    store: &dyn HistoryStore,
    user_id: &str,
    limit: usize,
) -> WritingStyleProfile {
    let documents = match store.fetch_recent_documents(user_id, limit).await {
        Ok(docs) => docs,
        Err(e) => {
            warn!(user_id, error = %e, "history store failed; using default style profile");
            return WritingStyleProfile::default();
        }
    };
    if documents.is_empty() {
        debug!(user_id, "no history; using default style profile");
        return WritingStyleProfile::default();
    }

    let blocks: Vec<&Block> = documents.iter().flat_map(|d| d.content.iter()).collect();
    let text: String = blocks
        .iter()
        .map(|b| b.plain_text())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    WritingStyleProfile {
        avg_sentence_length: avg_sentence_words(&text),
        formality_level: formality(&text),
        preferred_structure: preferred_structure(&blocks),
        common_phrases: common_phrases(&text),
        technical_term_density: technical_density(&text),
        uses_examples: EXAMPLE_CUES
            .iter()
            .any(|cue| text.to_lowercase().contains(cue)),
    }
}

fn avg_sentence_words(text: &str) -> f32 {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?', '。', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        return WritingStyleProfile::default().avg_sentence_length;
    }
    let words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
    words as f32 / sentences.len() as f32
}

/// Formality starts neutral and moves one point per cue hit, capped per side.
fn formality(text: &str) -> u8 {
    let lower = text.to_lowercase();
    let formal_hits = FORMAL_CUES.iter().filter(|c| lower.contains(*c)).count();
    let casual_hits = CASUAL_CUES.iter().filter(|c| lower.contains(*c)).count();
    let score = 5i32 + (formal_hits.min(4) as i32) - (casual_hits.min(4) as i32);
    score.clamp(0, 10) as u8
}

fn preferred_structure(blocks: &[&Block]) -> PreferredStructure {
    if blocks.is_empty() {
        return PreferredStructure::Mixed;
    }
    let total = blocks.len() as f32;
    let lists = blocks
        .iter()
        .filter(|b| {
            matches!(
                b.kind,
                BlockKind::BulletListItem | BlockKind::NumberedListItem
            )
        })
        .count() as f32;
    let headings = blocks.iter().filter(|b| b.is_heading()).count() as f32;
    let paragraphs = blocks.iter().filter(|b| b.is_paragraph()).count() as f32;

    if lists / total > 0.3 {
        PreferredStructure::Lists
    } else if headings / total > 0.2 {
        PreferredStructure::Headings
    } else if paragraphs / total > 0.7 {
        PreferredStructure::Paragraphs
    } else {
        PreferredStructure::Mixed
    }
}

/// Two- and three-word phrases repeated at least three times, top five.
fn common_phrases(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for n in [2usize, 3] {
        for window in words.windows(n) {
            counts
                .entry(window.join(" "))
                .and_modify(|c| *c += 1)
                .or_insert(1);
        }
    }

    let mut phrases: Vec<(String, usize)> =
        counts.into_iter().filter(|(_, c)| *c >= 3).collect();
    phrases.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    phrases.into_iter().take(5).map(|(p, _)| p).collect()
}

fn technical_density(text: &str) -> f32 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let technical = tokens
        .iter()
        .filter(|t| {
            let has_alpha = t.chars().any(|c| c.is_ascii_alphabetic());
            let has_digit = t.chars().any(|c| c.is_ascii_digit());
            (has_alpha && has_digit) || t.contains('_') || t.chars().count() > 14
        })
        .count();
    technical as f32 / tokens.len() as f32
}
