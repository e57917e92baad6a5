//! Pipeline Configuration
//!
//! Tunables for the editing pipeline. Everything has a sensible default so
//! `PipelineConfig::default()` is a working configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the editing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// TTL for cached document structures, in seconds. Documents churn, so
    /// this stays short.
    #[serde(default = "default_structure_ttl")]
    pub structure_ttl_seconds: u64,
    /// TTL for cached style profiles, in seconds. Style is stable.
    #[serde(default = "default_style_ttl")]
    pub style_ttl_seconds: u64,
    /// How many recent documents feed style inference
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Maximum concurrent search queries per request
    #[serde(default = "default_max_search_queries")]
    pub max_search_queries: usize,
    /// Maximum search results kept after deduplication
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    /// Character budget for the non-LLM summary fallback
    #[serde(default = "default_fallback_summary_chars")]
    pub fallback_summary_chars: usize,
    /// Minimum characters for a summary to count as usable
    #[serde(default = "default_min_summary_chars")]
    pub min_summary_chars: usize,
    /// Minimum characters for generated content to count as usable
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
    /// Word estimate used when a plan does not provide one
    #[serde(default = "default_target_words")]
    pub default_target_words: usize,
    /// Override for the safety-net apology template. `{section}` is replaced
    /// with the target section title. None uses the built-in bilingual text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apology_template: Option<String>,
}

fn default_structure_ttl() -> u64 {
    300
}

fn default_style_ttl() -> u64 {
    86_400
}

fn default_history_limit() -> usize {
    5
}

fn default_max_search_queries() -> usize {
    3
}

fn default_max_search_results() -> usize {
    5
}

fn default_fallback_summary_chars() -> usize {
    400
}

fn default_min_summary_chars() -> usize {
    50
}

fn default_min_content_chars() -> usize {
    20
}

fn default_target_words() -> usize {
    300
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            structure_ttl_seconds: default_structure_ttl(),
            style_ttl_seconds: default_style_ttl(),
            history_limit: default_history_limit(),
            max_search_queries: default_max_search_queries(),
            max_search_results: default_max_search_results(),
            fallback_summary_chars: default_fallback_summary_chars(),
            min_summary_chars: default_min_summary_chars(),
            min_content_chars: default_min_content_chars(),
            default_target_words: default_target_words(),
            apology_template: None,
        }
    }
}
