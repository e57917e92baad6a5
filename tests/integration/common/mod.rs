//! Shared Test Fixtures
//!
//! Mock collaborators and fixture documents used across the integration
//! tests. The scripted LLM replays queued responses in call order, which is
//! how multi-stage runs (plan, then generate) are driven deterministically.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use copydesk_core::{
    Block, CacheBackend, CacheError, CoreResult, HistoryDocument, HistoryStore,
};
use copydesk_llm::{
    LlmClient, LlmError, LlmResult, SearchProvider, SearchProviderError, SearchResult,
};

/// Replays queued responses in call order; errors once the script runs dry.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, _system: &str, _user: &str) -> LlmResult<String> {
        self.responses
            .lock()
            .expect("script lock")
            .pop_front()
            .ok_or_else(|| LlmError::other("scripted responses exhausted"))
    }
}

/// Fails every call.
pub struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn complete(&self, _system: &str, _user: &str) -> LlmResult<String> {
        Err(LlmError::ServerError {
            message: "model offline".to_string(),
            status: Some(503),
        })
    }
}

/// Returns the same canned hits for every query.
pub struct CannedSearch(pub Vec<SearchResult>);

#[async_trait]
impl SearchProvider for CannedSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchProviderError> {
        Ok(self.0.iter().take(max_results).cloned().collect())
    }
}

/// Fails every query.
pub struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchProviderError> {
        Err(SearchProviderError::new("resolver down"))
    }
}

/// A history store with nothing in it.
pub struct EmptyHistory;

#[async_trait]
impl HistoryStore for EmptyHistory {
    async fn fetch_recent_documents(
        &self,
        _user_id: &str,
        _limit: usize,
    ) -> CoreResult<Vec<HistoryDocument>> {
        Ok(Vec::new())
    }
}

/// A cache backend whose every call fails.
pub struct ThrowingCacheBackend;

#[async_trait]
impl CacheBackend for ThrowingCacheBackend {
    async fn get(&self, _key: &str) -> Result<Option<Value>, CacheError> {
        Err(CacheError::backend("backend unreachable"))
    }

    async fn set(&self, _key: &str, _value: Value, _ttl_seconds: u64) -> Result<(), CacheError> {
        Err(CacheError::backend("backend unreachable"))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::backend("backend unreachable"))
    }

    async fn keys(&self, _prefix: &str) -> Result<Vec<String>, CacheError> {
        Err(CacheError::backend("backend unreachable"))
    }
}

/// The Mars fixture document in the editor's raw JSON shape.
pub fn mars_raw_content() -> Value {
    json!([
        {"type": "heading", "props": {"level": 1}, "content": "Mars"},
        {"type": "heading", "props": {"level": 2}, "content": "History"},
        {"type": "paragraph", "content": [{"text": "Robotic exploration has run since the 1960s."}]},
        {"type": "heading", "props": {"level": 2}, "content": "Future"},
        {"type": "paragraph", "content": [{"text": "Starship may carry the first crews."}]},
    ])
}

/// The Mars fixture as normalized blocks.
pub fn mars_blocks() -> Vec<Block> {
    Block::normalized_all(&mars_raw_content())
}

/// A planning response following the LLM JSON contract.
pub fn planning_json(section: &str, action: &str, needs_search: bool) -> String {
    format!(
        r#"{{"thoughtProcess": "work on {section}", "targetLocation": {{"sectionTitle": "{section}"}}, "actionPlan": {{"type": "{action}", "estimatedWords": 200}}, "needsSearch": {needs_search}, "searchQueries": ["{section} facts"], "clarificationNeeded": false, "clarificationQuestions": [], "suggestions": []}}"#
    )
}

/// A structured-generation response following the LLM JSON contract.
pub fn generation_json(section: &str, content: &str) -> String {
    format!(
        r#"{{"modifications": [{{"type": "append", "target": "{section}", "content": "{content}"}}], "explanation": "Expanded {section}."}}"#
    )
}
