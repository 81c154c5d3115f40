//! BM25 full-text retrieval: inverted index and Okapi BM25 scoring.

/// Inverted index with postings lists and document length tracking.
pub mod inverted_index;
/// BM25 Okapi scoring with precomputed idf.
pub mod scorer;

pub use inverted_index::InvertedIndex;
pub use scorer::{Bm25Index, Bm25Params};
