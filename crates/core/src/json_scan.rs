//! JSON Extraction From Prose
//!
//! LLM responses that were asked for a JSON object frequently arrive wrapped
//! in code fences or surrounded by prose. This module recovers the first
//! balanced JSON object with an explicit scanner (string/escape/brace-depth
//! state), since braces inside string literals rule out a regex.

use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Extract the first balanced `{...}` object from free-form text.
///
/// Braces inside string literals are ignored; escaped quotes inside strings
/// are honored. Returns `None` when no complete object is present.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract and parse the first JSON object from free-form text.
pub fn parse_json_object(text: &str) -> CoreResult<Value> {
    let raw = extract_json_object(text)
        .ok_or_else(|| CoreError::parse("no JSON object found in response"))?;
    let value: Value = serde_json::from_str(raw)?;
    Ok(value)
}
