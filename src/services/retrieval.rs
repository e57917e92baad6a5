//! Retrieval Stage
//!
//! Optional, best-effort gathering of external facts: fan out the plan's
//! queries, deduplicate by URL, cap the result set, and summarize via one LLM
//! call with a non-LLM fallback. A failed provider yields an explicit
//! "search unavailable" context; retrieval is never a hard dependency for
//! generation.

use futures_util::future::join_all;
use tracing::{debug, warn};

use copydesk_llm::{LlmClient, SearchProvider, SearchResult};

use crate::config::PipelineConfig;
use crate::models::stages::SearchContext;
use crate::services::prompts;

/// Minimum cleaned-result length for the fallback summary.
const MIN_RESULT_CHARS: usize = 50;

/// Gather and summarize external context for the given queries.
pub async fn retrieve(
    provider: &dyn SearchProvider,
    llm: &dyn LlmClient,
    queries: &[String],
    config: &PipelineConfig,
) -> SearchContext {
    let queries: Vec<&String> = queries.iter().take(config.max_search_queries).collect();
    if queries.is_empty() {
        return SearchContext::unavailable();
    }

    let searches = queries
        .iter()
        .map(|q| provider.search(q.as_str(), config.max_search_results));
    let outcomes = join_all(searches).await;

    // Flatten in query order; empty results and provider errors are the same
    // "no external data" outcome.
    let mut results: Vec<SearchResult> = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(hits) => results.extend(hits),
            Err(e) => warn!(error = %e, "search query failed"),
        }
    }

    let results = dedup_by_url(results, config.max_search_results);
    if results.is_empty() {
        debug!("no search results; returning unavailable context");
        return SearchContext::unavailable();
    }

    let sources: Vec<String> = results.iter().map(|r| r.url.clone()).collect();
    let summary = summarize(llm, &results, config).await;

    SearchContext {
        raw_results: results,
        summary,
        sources,
    }
}

/// First occurrence wins; cap the kept set.
fn dedup_by_url(results: Vec<SearchResult>, cap: usize) -> Vec<SearchResult> {
    let mut seen: Vec<String> = Vec::new();
    let mut kept = Vec::new();
    for result in results {
        if seen.contains(&result.url) {
            continue;
        }
        seen.push(result.url.clone());
        kept.push(result);
        if kept.len() >= cap {
            break;
        }
    }
    kept
}

/// LLM summary with a deterministic fallback.
async fn summarize(
    llm: &dyn LlmClient,
    results: &[SearchResult],
    config: &PipelineConfig,
) -> String {
    let results_text: String = results
        .iter()
        .map(|r| format!("[{}]({})\n{}", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    match llm
        .complete(
            &prompts::summary_system_prompt(),
            &prompts::summary_user_prompt(&results_text),
        )
        .await
    {
        Ok(summary) if summary.trim().chars().count() >= config.min_summary_chars => {
            summary.trim().to_string()
        }
        Ok(_) => {
            warn!("model summary too short; using concatenation fallback");
            fallback_summary(results, config)
        }
        Err(e) => {
            warn!(error = %e, "summary call failed; using concatenation fallback");
            fallback_summary(results, config)
        }
    }
}

/// Non-LLM summary: whitespace-normalize and concatenate the first few
/// results, skipping anything too short to be informative.
fn fallback_summary(results: &[SearchResult], config: &PipelineConfig) -> String {
    let parts: Vec<String> = results
        .iter()
        .filter_map(|r| {
            let cleaned = r.content.split_whitespace().collect::<Vec<_>>().join(" ");
            if cleaned.chars().count() < MIN_RESULT_CHARS {
                return None;
            }
            Some(cleaned.chars().take(config.fallback_summary_chars).collect())
        })
        .take(3)
        .collect();
    parts.join("\n\n")
}
