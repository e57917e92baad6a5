//! Error Handling
//!
//! Pipeline-level error types. Every external dependency has a documented
//! degraded mode inside its own stage, so the only errors that reach this
//! type are the ones the orchestrator surfaces as an error payload.

use thiserror::Error;

use copydesk_core::CoreError;
use copydesk_llm::LlmError;

/// Pipeline-wide error type
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Errors from the core data model
    #[error(transparent)]
    Core(#[from] CoreError),

    /// LLM errors that escaped every fallback tier
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for pipeline errors
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
