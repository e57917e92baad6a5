//! LLM Client Trait
//!
//! Defines the common interface the pipeline uses for every language-model
//! call. The contract is intentionally narrow: one system prompt, one user
//! prompt, one text response. No streaming and no token-count contract, so
//! callers size prompts defensively.

use async_trait::async_trait;

use super::types::{LlmError, LlmResult};

/// Trait that all LLM callers must implement.
///
/// When a stage asks for JSON, the response contract is a single JSON object,
/// optionally wrapped in code fences or prose; recovery is the caller's job
/// (see `copydesk_core::json_scan`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the client name for identification.
    fn name(&self) -> &'static str;

    /// Send one prompt pair and get the complete text response.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<String>;

    /// Check if the provider is healthy and reachable.
    ///
    /// For API providers this validates the configuration; the default sends
    /// a minimal completion.
    async fn health_check(&self) -> LlmResult<()> {
        self.complete("You are a health check.", "Reply with OK.")
            .await
            .map(|_| ())
    }
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
            retry_after: None,
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
