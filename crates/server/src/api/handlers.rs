//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use crate::context::SearchContext;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use docsearch_core::authors::AuthorsFallback;
use docsearch_core::config;
use docsearch_core::corpus::ResolvedDocument;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<SearchContext>,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

/// Clamp `top_k` into `[MIN_TOP_K, MAX_TOP_K]`.
pub fn clamp_top_k(top_k: i64) -> usize {
    top_k.clamp(config::MIN_TOP_K as i64, config::MAX_TOP_K as i64) as usize
}

fn validate_query(query: &str) -> Result<(), ApiError> {
    if query.trim().is_empty() {
        return Err(ApiError::InvalidQuery("Query must not be empty".into()));
    }
    if query.len() > config::MAX_QUERY_LEN {
        return Err(ApiError::InvalidQuery(format!(
            "Query exceeds maximum length of {} bytes",
            config::MAX_QUERY_LEN
        )));
    }
    Ok(())
}

fn unavailable(strategy: &str) -> ApiError {
    ApiError::ServiceUnavailable(format!(
        "The {} search service is unavailable: its artifacts failed to load",
        strategy
    ))
}

fn into_results(documents: Vec<ResolvedDocument>) -> Vec<SearchResult> {
    documents.into_iter().map(SearchResult::from).collect()
}

/// `POST /search/tfidf`
pub async fn search_tfidf(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let backend = state.context.tfidf.as_ref().ok_or_else(|| unavailable("tfidf"))?;
    let Json(req) = body?;
    validate_query(&req.query)?;
    let k = clamp_top_k(req.top_k);

    let hits = backend.model.search(&req.query, k);
    let results = into_results(backend.documents.resolve(&hits, AuthorsFallback::Empty));
    metrics::record_search("tfidf", results.len());
    tracing::debug!(k, results = results.len(), "tfidf search");

    Ok(Json(SearchResponse::success(
        "Data retrieved successfully",
        results,
    )))
}

/// `POST /search/bm25`
pub async fn search_bm25(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let backend = state.context.bm25.as_ref().ok_or_else(|| unavailable("bm25"))?;
    let Json(req) = body?;
    validate_query(&req.query)?;
    let k = clamp_top_k(req.top_k);

    let hits = backend.model.search(&req.query, k);
    let results = into_results(backend.documents.resolve(&hits, AuthorsFallback::Empty));
    metrics::record_search("bm25", results.len());
    tracing::debug!(k, results = results.len(), "bm25 search");

    Ok(Json(SearchResponse::success(
        "Data retrieved successfully",
        results,
    )))
}

/// `POST /search/faiss`
pub async fn search_faiss(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let backend = state.context.dense.as_ref().ok_or_else(|| unavailable("faiss"))?;
    let Json(req) = body?;
    validate_query(&req.query)?;
    let k = clamp_top_k(req.top_k);

    let embedding = backend.embedder.embed(&req.query).await.map_err(|e| {
        tracing::error!("Query embedding failed: {}", e);
        ApiError::Internal(format!("Search failed: {}", e))
    })?;
    let neighbors = backend.index.search(&embedding, k).map_err(|e| {
        tracing::error!("Vector search failed: {}", e);
        ApiError::Internal(format!("Search failed: {}", e))
    })?;

    let results = into_results(
        backend
            .documents
            .resolve(&neighbors, AuthorsFallback::Verbatim),
    );
    metrics::record_search("faiss", results.len());

    Ok(Json(SearchResponse::success(
        format!("Found {} results", results.len()),
        results,
    )))
}

/// `GET /health`
///
/// Always 200; `status` is `degraded` while any strategy is unavailable.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ctx = &state.context;
    let status_of = |documents: Option<usize>| StrategyStatus {
        loaded: documents.is_some(),
        documents: documents.unwrap_or(0),
    };

    Json(HealthResponse {
        status: if ctx.all_loaded() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        strategies: StrategiesStatus {
            tfidf: status_of(ctx.tfidf.as_ref().map(|b| b.documents.len())),
            bm25: status_of(ctx.bm25.as_ref().map(|b| b.documents.len())),
            faiss: status_of(ctx.dense.as_ref().map(|b| b.documents.len())),
        },
    })
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_top_k() {
        assert_eq!(clamp_top_k(0), 1);
        assert_eq!(clamp_top_k(-7), 1);
        assert_eq!(clamp_top_k(5), 5);
        assert_eq!(clamp_top_k(1000), 100);
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query("neural networks").is_ok());
        assert!(matches!(validate_query(""), Err(ApiError::InvalidQuery(_))));
        assert!(matches!(validate_query(" \t\n"), Err(ApiError::InvalidQuery(_))));
        let long = "a".repeat(config::MAX_QUERY_LEN + 1);
        assert!(matches!(validate_query(&long), Err(ApiError::InvalidQuery(_))));
    }
}
