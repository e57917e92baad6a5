//! Host Backends
//!
//! Trait seams for the two collaborator services the host application owns: a
//! string-keyed TTL cache and a per-user document history store. The pipeline
//! treats both as opaque remote services; implementations must be safe for
//! concurrent access across simultaneous requests.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::block::Block;
use crate::error::CoreResult;

/// Errors from a cache backend.
///
/// Callers in the pipeline never propagate these; a failed cache call is
/// always downgraded to a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend unreachable, timed out, or refused the operation
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Value could not be (de)serialized
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// String-keyed get/set cache with per-call TTL.
///
/// Values are opaque JSON-serializable objects. `keys` enumeration exists for
/// diagnostics only and is never called on the request hot path.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Look up a key. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Store a value under a key with a TTL in seconds.
    async fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Enumerate keys under a prefix. Diagnostics only.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, CacheError>;
}

/// One past document from a user's history.
#[derive(Debug, Clone)]
pub struct HistoryDocument {
    /// The document's normalized blocks
    pub content: Vec<Block>,
}

impl HistoryDocument {
    /// Wrap a block sequence as a history document
    pub fn new(content: Vec<Block>) -> Self {
        Self { content }
    }
}

/// Supplies a user's recent documents for style inference.
///
/// An empty result is valid and must degrade to the default style profile,
/// never an error.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Fetch up to `limit` documents, most recent first.
    async fn fetch_recent_documents(
        &self,
        user_id: &str,
        limit: usize,
    ) -> CoreResult<Vec<HistoryDocument>>;
}
