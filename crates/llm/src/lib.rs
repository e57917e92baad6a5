//! Copydesk LLM
//!
//! Narrow interfaces to the pipeline's two generative collaborators: a
//! language-model caller and a web-search provider. The pipeline only ever
//! sees the `LlmClient` and `SearchProvider` traits; the HTTP implementations
//! here are what the host wires in by default.
//!
//! ## Module Organization
//!
//! - `types` - LLM error taxonomy (`LlmError`, `LlmResult`)
//! - `client` - The `LlmClient` trait and HTTP error mapping helpers
//! - `openai` - OpenAI-compatible chat-completions implementation
//! - `search` - The `SearchProvider` trait and a JSON-API implementation

pub mod client;
pub mod openai;
pub mod search;
pub mod types;

// ── LLM Caller ─────────────────────────────────────────────────────────
pub use client::{missing_api_key_error, parse_http_error, LlmClient};
pub use openai::{OpenAiClientConfig, OpenAiCompatibleClient};
pub use types::{LlmError, LlmResult};

// ── Web Search ─────────────────────────────────────────────────────────
pub use search::{HttpSearchProvider, SearchProvider, SearchProviderError, SearchResult};
