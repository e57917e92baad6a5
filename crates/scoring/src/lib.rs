//! Copydesk Scoring
//!
//! Heuristic validation checks run over generated content before it is
//! returned for preview: an SEO check, a readability check, a coarse
//! completeness quality score, and word-level diff statistics. All checks are
//! pure functions; none of them consults an external service.
//!
//! ## Module Organization
//!
//! - `models` - Check result types (`SeoCheck`, `ReadabilityCheck`)
//! - `seo` - Title / heading / keyword-density heuristics
//! - `readability` - Sentence-length grade and complex-token deduction
//! - `quality` - Completeness score and diff statistics

pub mod models;
pub mod quality;
pub mod readability;
pub mod seo;

// ── Check Results ──────────────────────────────────────────────────────
pub use models::{ReadabilityCheck, ReadabilityGrade, SeoCheck};

// ── Checks ─────────────────────────────────────────────────────────────
pub use quality::{diff_stats, quality_score};
pub use readability::check_readability;
pub use seo::check_seo;
