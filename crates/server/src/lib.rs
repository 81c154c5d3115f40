//! HTTP search service over pre-built TF-IDF, BM25 and dense-embedding artifacts.

/// REST API: router, handlers, request/response models and metrics.
pub mod api;
/// Artifact loading and the shared, read-only search state.
pub mod context;
/// Query and document encoders for dense search.
pub mod embedding;
