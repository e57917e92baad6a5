//! Response Language Selection
//!
//! Output language is chosen per request by scanning the instruction for CJK
//! characters. No per-user language preference is consulted.

/// The language generated content is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// English
    En,
    /// Chinese
    Zh,
}

/// Pick the response language for an instruction.
pub fn detect_language(instruction: &str) -> Language {
    if instruction.chars().any(is_cjk) {
        Language::Zh
    } else {
        Language::En
    }
}

/// Whether a character falls in the common CJK unified ranges.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // Extension A
        | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        | '\u{3000}'..='\u{303F}'   // CJK punctuation
    )
}
