//! Prometheus metrics recording.

use crate::context::SearchContext;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a completed search and the number of results it returned.
pub fn record_search(strategy: &'static str, results: usize) {
    counter!("docsearch_search_total", "strategy" => strategy).increment(1);
    histogram!("docsearch_search_results", "strategy" => strategy).record(results as f64);
}

/// Sets the per-strategy document gauges. The context never changes after
/// startup, so this runs once.
pub fn update_corpus_metrics(context: &SearchContext) {
    let counts = [
        ("tfidf", context.tfidf.as_ref().map(|b| b.documents.len())),
        ("bm25", context.bm25.as_ref().map(|b| b.documents.len())),
        ("faiss", context.dense.as_ref().map(|b| b.documents.len())),
    ];
    for (strategy, documents) in counts {
        gauge!("docsearch_documents_total", "strategy" => strategy)
            .set(documents.unwrap_or(0) as f64);
        gauge!("docsearch_strategy_loaded", "strategy" => strategy)
            .set(if documents.is_some() { 1.0 } else { 0.0 });
    }
}
