//! # docsearch-core
//!
//! Ranking engine behind the docsearch HTTP API: TF-IDF cosine similarity,
//! BM25 Okapi scoring and exact dense-vector nearest neighbor search over a
//! fixed document corpus, plus the document tables and author normalization
//! shared by all three.
//!
//! This crate has no async dependencies; models are fitted offline, persisted
//! as checksummed artifacts and loaded read-only by the server.

/// Strict parsing and normalization of string-encoded author lists.
pub mod authors;
/// BM25 full-text search: inverted index and Okapi scoring.
pub mod bm25;
/// Global configuration constants: ranking parameters, limits and defaults.
pub mod config;
/// Document tables and ranked-position lookup.
pub mod corpus;
/// Core document types: `DocumentRecord` and `AuthorsField`.
pub mod document;
/// Artifact persistence with CRC32-checked bincode payloads.
pub mod persistence;
/// Bounded top-k selection.
pub mod ranking;
/// TF-IDF vectorizer, CSR matrix and cosine ranking.
pub mod tfidf;
/// Word tokenizer with optional stop word removal.
pub mod tokenizer;
/// Dense vector index and distance metrics.
pub mod vector;
