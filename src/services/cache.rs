//! Cache Layer
//!
//! Content-hash-keyed storage for analyzer output and style fingerprints,
//! wrapped around the host's `CacheBackend`. Every backend failure is caught
//! and downgraded to a miss; the pipeline must be fully correct (just slower)
//! with no cache at all.
//!
//! Structure keys embed a hash of the blocks, so any content edit lands on a
//! new key and the old one ages out via TTL. No explicit invalidation is
//! needed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mini_moka::sync::{Cache, ConcurrentCacheExt};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use copydesk_core::{Block, CacheBackend, CacheError, DocumentStructure, WritingStyleProfile};

use crate::config::PipelineConfig;

/// Key prefix for cached document structures
const STRUCTURE_PREFIX: &str = "copydesk:structure";

/// Key prefix for cached style profiles
const STYLE_PREFIX: &str = "copydesk:style";

// A "copydesk:search" prefix is reserved for search-result caching, which is
// an extension point and intentionally not implemented.

/// Maximum in-memory cache entries for the bundled backend
const MAX_CACHE_ENTRIES: u64 = 1024;

/// Diagnostic entry counts, computed via prefix enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Cached document structures
    pub structure_entries: usize,
    /// Cached style profiles
    pub style_entries: usize,
}

/// Best-effort cache for derived pipeline artifacts.
pub struct DocumentCache {
    backend: Arc<dyn CacheBackend>,
    structure_ttl: u64,
    style_ttl: u64,
}

impl DocumentCache {
    /// Wrap a backend with the configured TTLs.
    pub fn new(backend: Arc<dyn CacheBackend>, config: &PipelineConfig) -> Self {
        Self {
            backend,
            structure_ttl: config.structure_ttl_seconds,
            style_ttl: config.style_ttl_seconds,
        }
    }

    /// Key for one document's structure at one content state.
    fn structure_key(doc_id: &str, blocks: &[Block]) -> String {
        format!("{}:{}:{}", STRUCTURE_PREFIX, doc_id, content_hash(blocks))
    }

    /// Key for one user's style profile.
    fn style_key(user_id: &str) -> String {
        format!("{}:{}", STYLE_PREFIX, user_id)
    }

    /// Look up the analyzed structure for this exact content. Miss on any
    /// backend failure.
    pub async fn get_structure(
        &self,
        doc_id: &str,
        blocks: &[Block],
    ) -> Option<DocumentStructure> {
        let key = Self::structure_key(doc_id, blocks);
        match self.backend.get(&key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(structure) => {
                    debug!(doc_id, "structure cache hit");
                    Some(structure)
                }
                Err(e) => {
                    warn!(doc_id, error = %e, "cached structure undecodable; treating as miss");
                    None
                }
            },
            Ok(None) => {
                debug!(doc_id, "structure cache miss");
                None
            }
            Err(e) => {
                warn!(doc_id, error = %e, "structure cache lookup failed; treating as miss");
                None
            }
        }
    }

    /// Store an analyzed structure. Failures are logged and dropped.
    pub async fn put_structure(
        &self,
        doc_id: &str,
        blocks: &[Block],
        structure: &DocumentStructure,
    ) {
        let key = Self::structure_key(doc_id, blocks);
        let value = match serde_json::to_value(structure) {
            Ok(v) => v,
            Err(e) => {
                warn!(doc_id, error = %e, "structure not serializable; skipping cache write");
                return;
            }
        };
        if let Err(e) = self.backend.set(&key, value, self.structure_ttl).await {
            warn!(doc_id, error = %e, "structure cache write failed");
        }
    }

    /// Look up a user's style profile. Miss on any backend failure.
    pub async fn get_style(&self, user_id: &str) -> Option<WritingStyleProfile> {
        match self.backend.get(&Self::style_key(user_id)).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(profile) => {
                    debug!(user_id, "style cache hit");
                    Some(profile)
                }
                Err(e) => {
                    warn!(user_id, error = %e, "cached style undecodable; treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(user_id, error = %e, "style cache lookup failed; treating as miss");
                None
            }
        }
    }

    /// Store a user's style profile. Failures are logged and dropped.
    pub async fn put_style(&self, user_id: &str, profile: &WritingStyleProfile) {
        let value = match serde_json::to_value(profile) {
            Ok(v) => v,
            Err(e) => {
                warn!(user_id, error = %e, "style not serializable; skipping cache write");
                return;
            }
        };
        if let Err(e) = self
            .backend
            .set(&Self::style_key(user_id), value, self.style_ttl)
            .await
        {
            warn!(user_id, error = %e, "style cache write failed");
        }
    }

    /// Drop a user's cached style profile.
    pub async fn clear_user(&self, user_id: &str) {
        if let Err(e) = self.backend.delete(&Self::style_key(user_id)).await {
            warn!(user_id, error = %e, "style cache delete failed");
        }
    }

    /// Entry counts for diagnostics. Never called on the request hot path.
    pub async fn stats(&self) -> CacheStats {
        let structure_entries = self
            .backend
            .keys(STRUCTURE_PREFIX)
            .await
            .map(|k| k.len())
            .unwrap_or(0);
        let style_entries = self
            .backend
            .keys(STYLE_PREFIX)
            .await
            .map(|k| k.len())
            .unwrap_or(0);
        CacheStats {
            structure_entries,
            style_entries,
        }
    }
}

/// SHA-256 over the serialized block sequence.
fn content_hash(blocks: &[Block]) -> String {
    let bytes = serde_json::to_vec(blocks).unwrap_or_default();
    format!("{:x}", Sha256::digest(&bytes))
}

#[derive(Clone)]
struct TimedValue {
    value: Value,
    expires_at: Instant,
}

/// In-memory backend over mini-moka.
///
/// mini-moka's TTL is per cache, not per entry, so entries carry their own
/// deadline and expire lazily on read; the cache-level TTL is only an
/// eviction backstop.
pub struct MokaCacheBackend {
    cache: Cache<String, TimedValue>,
}

impl MokaCacheBackend {
    /// Create a backend bounded by entry count, with a one-day backstop TTL.
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(86_400))
            .build();
        Self { cache }
    }
}

impl Default for MokaCacheBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CacheBackend for MokaCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        match self.cache.get(&key.to_string()) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value)),
            Some(_) => {
                self.cache.invalidate(&key.to_string());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> Result<(), CacheError> {
        self.cache.insert(
            key.to_string(),
            TimedValue {
                value,
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(&key.to_string());
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        // Flush pending writes so enumeration sees recent inserts.
        self.cache.sync();
        Ok(self
            .cache
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect())
    }
}

/// A backend that stores nothing. Every lookup is a miss.
pub struct NoopCacheBackend;

#[async_trait::async_trait]
impl CacheBackend for NoopCacheBackend {
    async fn get(&self, _key: &str) -> Result<Option<Value>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Value, _ttl_seconds: u64) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn keys(&self, _prefix: &str) -> Result<Vec<String>, CacheError> {
        Ok(Vec::new())
    }
}
