//! Writing Style Profile
//!
//! A per-user fingerprint derived from recent documents, used to steer
//! generation tone. Style changes slowly, so profiles are cached with a long
//! TTL compared to document structure.

use serde::{Deserialize, Serialize};

/// The document structure a user tends to write in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredStructure {
    /// Mostly prose paragraphs
    Paragraphs,
    /// Heavy use of bullet or numbered lists
    Lists,
    /// Many short heading-delimited sections
    Headings,
    /// No dominant pattern
    Mixed,
}

impl Default for PreferredStructure {
    fn default() -> Self {
        PreferredStructure::Mixed
    }
}

impl std::fmt::Display for PreferredStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferredStructure::Paragraphs => write!(f, "paragraphs"),
            PreferredStructure::Lists => write!(f, "lists"),
            PreferredStructure::Headings => write!(f, "headings"),
            PreferredStructure::Mixed => write!(f, "mixed"),
        }
    }
}

/// A user's writing-style fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingStyleProfile {
    /// Average sentence length in words
    pub avg_sentence_length: f32,
    /// Formality on a 0 (casual) to 10 (formal) scale
    pub formality_level: u8,
    /// Dominant document structure
    pub preferred_structure: PreferredStructure,
    /// Recurring multi-word phrases
    pub common_phrases: Vec<String>,
    /// Ratio of technical-looking tokens to all tokens
    pub technical_term_density: f32,
    /// Whether the user habitually illustrates points with examples
    pub uses_examples: bool,
}

impl Default for WritingStyleProfile {
    /// The neutral profile used when a user has no history.
    fn default() -> Self {
        Self {
            avg_sentence_length: 15.0,
            formality_level: 5,
            preferred_structure: PreferredStructure::Mixed,
            common_phrases: Vec::new(),
            technical_term_density: 0.05,
            uses_examples: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_neutral() {
        let profile = WritingStyleProfile::default();
        assert_eq!(profile.formality_level, 5);
        assert_eq!(profile.preferred_structure, PreferredStructure::Mixed);
        assert!(profile.common_phrases.is_empty());
    }

    #[test]
    fn test_structure_display() {
        assert_eq!(PreferredStructure::Lists.to_string(), "lists");
        assert_eq!(PreferredStructure::Mixed.to_string(), "mixed");
    }
}
