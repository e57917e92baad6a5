//! Quality Score and Diff Statistics
//!
//! The quality score grades completeness against the plan's word estimate.
//! It is deliberately coarse, not a correctness judgment.

use similar::{ChangeTag, TextDiff};

use copydesk_core::ChangesSummary;

/// Words per minute used for reading-time deltas
const READING_WPM: usize = 200;

/// Completeness score: `min(10, words/target * 10) * 0.8`.
///
/// A zero target (rule-based plans can omit an estimate) counts as met.
pub fn quality_score(words_generated: usize, target_words: usize) -> f32 {
    if target_words == 0 {
        return 8.0;
    }
    let ratio = words_generated as f32 / target_words as f32;
    (ratio * 10.0).min(10.0) * 0.8
}

/// Word-level diff statistics between the old and new text.
pub fn diff_stats(old_text: &str, new_text: &str) -> ChangesSummary {
    let diff = TextDiff::from_words(old_text, new_text);
    let mut added = 0i64;
    let mut removed = 0i64;
    for change in diff.iter_all_changes() {
        if change.value().trim().is_empty() {
            continue;
        }
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }

    ChangesSummary {
        words_added: added - removed,
        reading_time_delta_minutes: reading_minutes(new_text) - reading_minutes(old_text),
    }
}

fn reading_minutes(text: &str) -> i64 {
    let words = text.split_whitespace().count();
    (words.div_ceil(READING_WPM)) as i64
}
