//! Copydesk Core
//!
//! Foundational data model, error types, and collaborator traits for the
//! Copydesk workspace. This crate has zero dependencies on application-level
//! code (HTTP clients, caches, LLM providers, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `block` - Typed content blocks and inline-content normalization
//! - `document` - Derived document structure (`OutlineNode`, `Section`, stats)
//! - `profile` - Per-user writing style fingerprint
//! - `modification` - Atomic edit operations returned to the caller
//! - `json_scan` - Brace-matched JSON extraction from prose responses
//! - `backend` - Cache and history-store traits implemented by the host
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/async-trait/thiserror** - keeps build times minimal
//! 2. **Trait-based abstractions** - enables mocking, testing, and future crate splitting
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod backend;
pub mod block;
pub mod document;
pub mod error;
pub mod json_scan;
pub mod modification;
pub mod profile;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Block Model ────────────────────────────────────────────────────────
pub use block::{Block, BlockContent, BlockKind, InlineRun};

// ── Document Structure ─────────────────────────────────────────────────
pub use document::{DocumentStats, DocumentStructure, OutlineNode, Section};

// ── Style Profile ──────────────────────────────────────────────────────
pub use profile::{PreferredStructure, WritingStyleProfile};

// ── Modifications ──────────────────────────────────────────────────────
pub use modification::{ChangesSummary, GenerationResult, Modification, ModificationType};

// ── JSON Extraction ────────────────────────────────────────────────────
pub use json_scan::{extract_json_object, parse_json_object};

// ── Host Backends ──────────────────────────────────────────────────────
pub use backend::{CacheBackend, CacheError, HistoryDocument, HistoryStore};
