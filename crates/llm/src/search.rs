//! Web Search Provider
//!
//! The retrieval stage's external collaborator. Empty results and errors are
//! both valid provider outcomes and the pipeline handles them identically, so
//! implementations should not try to paper over failures themselves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result URL
    pub url: String,
    /// Snippet or page content
    pub content: String,
}

/// Errors from a search provider.
#[derive(Debug, Clone)]
pub struct SearchProviderError {
    /// What went wrong
    pub message: String,
}

impl std::fmt::Display for SearchProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Search provider error: {}", self.message)
    }
}

impl std::error::Error for SearchProviderError {}

impl SearchProviderError {
    /// Create a provider error
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Trait for web-search collaborators.
///
/// No ranking guarantees beyond provider order are assumed.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query and return up to `max_results` hits.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchProviderError>;
}

/// A provider against a SearxNG-style JSON search API.
///
/// Expects `GET {base_url}?q=...&format=json` returning
/// `{"results": [{"title", "url", "content"}, ...]}`.
pub struct HttpSearchProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchApiResponse {
    #[serde(default)]
    results: Vec<SearchApiHit>,
}

#[derive(Debug, Deserialize)]
struct SearchApiHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl HttpSearchProvider {
    /// Create a provider against the given search endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent("Copydesk/0.1")
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn build_url(&self, query: &str) -> Result<Url, SearchProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SearchProviderError::new(format!("invalid base URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json");
        Ok(url)
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchProviderError> {
        let url = self.build_url(query)?;
        debug!(%query, "dispatching search query");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchProviderError::new(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchProviderError::new(format!(
                "HTTP {} from search endpoint",
                status.as_u16()
            )));
        }

        let parsed: SearchApiResponse = response
            .json()
            .await
            .map_err(|e| SearchProviderError::new(format!("invalid payload: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .filter(|hit| !hit.url.is_empty())
            .take(max_results)
            .map(|hit| SearchResult {
                title: hit.title,
                url: hit.url,
                content: hit.content,
            })
            .collect())
    }
}
