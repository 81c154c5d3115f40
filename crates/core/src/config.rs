//! Global configuration constants for docsearch.
//!
//! Ranking parameters, request limits, artifact file names and server defaults
//! are defined here. These are compile-time constants; runtime configuration is
//! handled via CLI arguments and environment variables in the binaries.

/// BM25 Okapi term frequency saturation parameter.
///
/// Controls how quickly term frequency saturates. Higher values allow TF to grow more.
pub const BM25_K1: f32 = 1.5;

/// BM25 Okapi document length normalization parameter.
///
/// 0.0 = no normalization, 1.0 = full normalization.
pub const BM25_B: f32 = 0.75;

/// Floor applied to negative BM25 idf values, as a fraction of the average idf.
///
/// Terms present in more than half of the corpus get a negative Okapi idf;
/// they are clamped to `BM25_EPSILON * average_idf` instead.
pub const BM25_EPSILON: f32 = 0.25;

/// Number of results returned when a request omits `top_k`.
pub const DEFAULT_TOP_K: usize = 5;

/// Lower bound for `top_k` after clamping.
pub const MIN_TOP_K: usize = 1;

/// Upper bound for `top_k` after clamping.
pub const MAX_TOP_K: usize = 100;

/// Maximum query length in bytes.
pub const MAX_QUERY_LEN: usize = 4_096;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default directory holding the trained artifacts.
pub const DEFAULT_MODELS_DIR: &str = "./models";

/// Fitted TF-IDF vectorizer and document-term matrix.
pub const TFIDF_MODEL_FILE: &str = "tfidf_model.bin";

/// Document table aligned with the TF-IDF matrix rows.
pub const TFIDF_DOCUMENTS_FILE: &str = "tfidf_documents.json";

/// BM25 scoring structure.
pub const BM25_MODEL_FILE: &str = "bm25_model.bin";

/// Document table aligned with the BM25 corpus.
pub const BM25_DOCUMENTS_FILE: &str = "bm25_documents.json";

/// Flat vector index over document embeddings.
pub const DENSE_INDEX_FILE: &str = "dense_index.bin";

/// Metadata sidecar aligned with the dense index positions.
pub const DENSE_METADATA_FILE: &str = "dense_metadata.json";

/// Cache directory for the sentence-embedding model, relative to the models dir.
pub const EMBEDDING_CACHE_DIR: &str = "sentence-transformers";

/// Default embedding model name (all-MiniLM-L6-v2 sentence encoder).
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Default Ollama endpoint for the HTTP embedding backend.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum HTTP request body size in bytes (64 KB).
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Maximum embedding dimension accepted when loading a dense index.
pub const MAX_DIMENSION: usize = 4096;
