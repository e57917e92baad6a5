//! Retrieval Integration Tests
//!
//! Query fan-out, URL deduplication, the summary fallback ladder, and the
//! unavailable-context degradation.

use copydesk::services::retrieval;
use copydesk::PipelineConfig;
use copydesk_llm::SearchResult;

use crate::common::{CannedSearch, FailingLlm, FailingSearch, ScriptedLlm};

fn hit(url: &str) -> SearchResult {
    SearchResult {
        title: format!("Result {}", url),
        url: url.to_string(),
        content: "Perseverance landed in Jezero crater in February 2021 and has cached samples since."
            .to_string(),
    }
}

#[tokio::test]
async fn test_retrieval_with_model_summary() {
    let provider = CannedSearch(vec![hit("https://nasa.example/mars")]);
    let llm = ScriptedLlm::new(vec![
        "Perseverance has operated in Jezero crater since February 2021, caching samples for a future return mission.".to_string(),
    ]);
    let context = retrieval::retrieve(
        &provider,
        &llm,
        &["perseverance status".to_string()],
        &PipelineConfig::default(),
    )
    .await;

    assert!(!context.is_unavailable());
    assert!(context.summary.contains("Jezero"));
    assert_eq!(context.sources.len(), 1);
}

#[tokio::test]
async fn test_retrieval_summary_fallback_without_model() {
    let provider = CannedSearch(vec![hit("https://nasa.example/mars")]);
    let context = retrieval::retrieve(
        &provider,
        &FailingLlm,
        &["perseverance status".to_string()],
        &PipelineConfig::default(),
    )
    .await;

    // The concatenation fallback reuses the raw result content.
    assert!(context.summary.contains("Perseverance"));
    assert!(!context.raw_results.is_empty());
}

#[tokio::test]
async fn test_provider_failure_returns_unavailable_context() {
    let context = retrieval::retrieve(
        &FailingSearch,
        &FailingLlm,
        &["anything".to_string()],
        &PipelineConfig::default(),
    )
    .await;

    assert!(context.is_unavailable());
    assert!(context.sources.is_empty());
}

#[tokio::test]
async fn test_no_queries_returns_unavailable_context() {
    let provider = CannedSearch(vec![hit("https://nasa.example/mars")]);
    let context =
        retrieval::retrieve(&provider, &FailingLlm, &[], &PipelineConfig::default()).await;
    assert!(context.is_unavailable());
}

#[tokio::test]
async fn test_duplicate_urls_kept_once() {
    let provider = CannedSearch(vec![
        hit("https://a.example"),
        hit("https://a.example"),
        hit("https://b.example"),
    ]);
    let context = retrieval::retrieve(
        &provider,
        &ScriptedLlm::new(vec![
            "Both pages describe the Perseverance rover's sample caching campaign in Jezero crater.".to_string(),
        ]),
        &["rover samples".to_string()],
        &PipelineConfig::default(),
    )
    .await;

    assert_eq!(context.raw_results.len(), 2);
    assert_eq!(context.sources.len(), 2);
}
