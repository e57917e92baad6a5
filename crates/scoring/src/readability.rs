//! Readability Check
//!
//! Grades content by average sentence length and deducts for a high ratio of
//! complex tokens. Character thresholds keep the grade meaningful for CJK
//! prose, where word tokenization is unreliable.

use crate::models::{ReadabilityCheck, ReadabilityGrade};

/// Sentences averaging under this many characters grade easy
const EASY_MAX_CHARS: f32 = 20.0;

/// Sentences averaging under this many characters grade medium
const MEDIUM_MAX_CHARS: f32 = 30.0;

/// Complex-token ratio above this takes a small deduction
const COMPLEX_RATIO_SOFT: f32 = 0.10;

/// Complex-token ratio above this takes a large deduction
const COMPLEX_RATIO_HARD: f32 = 0.20;

/// Run the readability heuristics over content.
pub fn check_readability(content: &str) -> ReadabilityCheck {
    let sentences = split_sentences(content);
    let avg_sentence_chars = if sentences.is_empty() {
        0.0
    } else {
        let total: usize = sentences.iter().map(|s| s.chars().count()).sum();
        total as f32 / sentences.len() as f32
    };

    let grade = if avg_sentence_chars < EASY_MAX_CHARS {
        ReadabilityGrade::Easy
    } else if avg_sentence_chars < MEDIUM_MAX_CHARS {
        ReadabilityGrade::Medium
    } else {
        ReadabilityGrade::Hard
    };

    let complex_token_ratio = complex_token_ratio(content);

    let mut findings = Vec::new();
    let mut score: f32 = match grade {
        ReadabilityGrade::Easy => 9.0,
        ReadabilityGrade::Medium => 7.0,
        ReadabilityGrade::Hard => 5.0,
    };
    if grade == ReadabilityGrade::Hard {
        findings.push(format!(
            "Sentences average {:.0} characters; consider splitting",
            avg_sentence_chars
        ));
    }
    if complex_token_ratio > COMPLEX_RATIO_HARD {
        score -= 2.0;
        findings.push("Heavy jargon or code density".to_string());
    } else if complex_token_ratio > COMPLEX_RATIO_SOFT {
        score -= 1.0;
        findings.push("Noticeable jargon or code density".to_string());
    }

    ReadabilityCheck {
        score: score.clamp(0.0, 10.0),
        grade,
        avg_sentence_chars,
        complex_token_ratio,
        findings,
    }
}

/// Split text on sentence terminators, Latin and CJK.
fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?', '。', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ratio of tokens that look like jargon or code: mixed alphanumeric runs,
/// underscore/path separators, or very long words.
fn complex_token_ratio(text: &str) -> f32 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let complex = tokens.iter().filter(|t| is_complex_token(t)).count();
    complex as f32 / tokens.len() as f32
}

fn is_complex_token(token: &str) -> bool {
    let has_alpha = token.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    (has_alpha && has_digit)
        || token.contains('_')
        || token.contains("::")
        || token.chars().count() > 18
}
