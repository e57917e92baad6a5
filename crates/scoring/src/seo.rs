//! SEO Check
//!
//! Title-length, heading-structure, and keyword-density heuristics over
//! markdown-flavored content. Deliberately coarse; this grades presentation
//! hygiene, not search ranking.

use crate::models::SeoCheck;

/// Optimal title length lower bound, in characters
const TITLE_MIN_CHARS: usize = 30;

/// Optimal title length upper bound, in characters
const TITLE_MAX_CHARS: usize = 60;

/// Keyword density above this reads as stuffing
const KEYWORD_DENSITY_MAX: f32 = 0.05;

/// Run the SEO heuristics over a title and markdown content.
pub fn check_seo(title: &str, content: &str) -> SeoCheck {
    let mut findings = Vec::new();
    let mut score = 10.0f32;

    let title_length = title.chars().count();
    if title_length == 0 {
        score -= 3.0;
        findings.push("Document has no title".to_string());
    } else if title_length < TITLE_MIN_CHARS || title_length > TITLE_MAX_CHARS {
        score -= 2.0;
        findings.push(format!(
            "Title is {} characters; {}-{} is optimal",
            title_length, TITLE_MIN_CHARS, TITLE_MAX_CHARS
        ));
    }

    let heading_count = count_markdown_headings(content, 2);
    let subheading_count = count_markdown_headings(content, 3);
    if heading_count == 0 {
        score -= 2.0;
        findings.push("Content has no level-2 headings".to_string());
    }

    let keyword_density = primary_keyword_density(title, content);
    if keyword_density == 0.0 && !title.is_empty() {
        score -= 2.0;
        findings.push("Primary keyword from the title does not appear in the content".to_string());
    } else if keyword_density > KEYWORD_DENSITY_MAX {
        score -= 1.0;
        findings.push(format!(
            "Primary keyword density {:.1}% looks like stuffing",
            keyword_density * 100.0
        ));
    }

    SeoCheck {
        score: score.clamp(0.0, 10.0),
        title_length,
        heading_count,
        subheading_count,
        keyword_density,
        findings,
    }
}

/// Count markdown heading lines of exactly the given level.
fn count_markdown_headings(content: &str, level: usize) -> usize {
    let marker = "#".repeat(level);
    content
        .lines()
        .map(str::trim_start)
        .filter(|line| {
            line.starts_with(&marker)
                && !line[level..].starts_with('#')
                && line[level..].starts_with(' ')
        })
        .count()
}

/// Occurrence rate of the title's first multi-character token in the content.
fn primary_keyword_density(title: &str, content: &str) -> f32 {
    let keyword = match title
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|w| w.chars().count() > 1)
    {
        Some(k) => k.to_lowercase(),
        None => return 0.0,
    };

    let words: Vec<String> = content
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }

    let hits = words.iter().filter(|w| *w == &keyword).count();
    hits as f32 / words.len() as f32
}
