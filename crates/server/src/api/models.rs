//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling via Axum.

use docsearch_core::config;
use docsearch_core::corpus::ResolvedDocument;
use serde::{Deserialize, Serialize};

/// Request body shared by every `POST /search/*` endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Signed so that negative values clamp instead of failing to parse.
    #[serde(default = "default_top_k")]
    pub top_k: i64,
}

fn default_top_k() -> i64 {
    config::DEFAULT_TOP_K as i64
}

/// A single matched document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub url: String,
    pub published: String,
    pub authors: Vec<String>,
}

impl From<ResolvedDocument> for SearchResult {
    fn from(doc: ResolvedDocument) -> Self {
        Self {
            title: doc.title,
            abstract_text: doc.abstract_text,
            url: doc.url,
            published: doc.published,
            authors: doc.authors,
        }
    }
}

/// Envelope returned by every search endpoint, on success and on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub data: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn success(message: impl Into<String>, data: Vec<SearchResult>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data,
        }
    }

    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.to_string(),
            message: message.into(),
            data: Vec::new(),
        }
    }
}

/// Load state of one search strategy.
#[derive(Debug, Serialize, Deserialize)]
pub struct StrategyStatus {
    pub loaded: bool,
    pub documents: usize,
}

/// Per-strategy section of [`HealthResponse`].
#[derive(Debug, Serialize, Deserialize)]
pub struct StrategiesStatus {
    pub tfidf: StrategyStatus,
    pub bm25: StrategyStatus,
    pub faiss: StrategyStatus,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub strategies: StrategiesStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query":"graphs"}"#).unwrap();
        assert_eq!(req.top_k, 5);
        let req: SearchRequest = serde_json::from_str(r#"{"query":"x","top_k":-3}"#).unwrap();
        assert_eq!(req.top_k, -3);
    }

    #[test]
    fn test_result_serializes_abstract_key() {
        let result = SearchResult {
            title: "T".into(),
            abstract_text: "A".into(),
            url: String::new(),
            published: "2020-01-01".into(),
            authors: vec!["X".into()],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["abstract"], "A");
        assert!(value.get("abstract_text").is_none());
    }

    #[test]
    fn test_failure_envelope() {
        let value = serde_json::to_value(SearchResponse::failure("INVALID_QUERY", "bad")).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["data"], serde_json::json!([]));
    }
}
