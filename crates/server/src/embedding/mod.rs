//! Sentence-embedding backends for dense search.
//!
//! The dense strategy only needs to turn text into a vector living in the same
//! space as the indexed documents. [`EmbeddingProvider`] abstracts over where
//! that happens: an Ollama server over HTTP, or (with the `fastembed` feature)
//! a local ONNX model.

/// Local ONNX sentence encoder via fastembed.
#[cfg(feature = "fastembed")]
pub mod fastembed;
/// Ollama `/api/embed` HTTP backend.
pub mod ollama;

use async_trait::async_trait;
use clap::ValueEnum;
use docsearch_core::config;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The backend could not be reached or returned an error.
    #[error("embedding backend error: {0}")]
    Backend(String),

    /// Invalid input text (e.g., empty)
    #[error("invalid input text: {0}")]
    InvalidInput(String),

    /// Unsupported model or backend configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Trait for text embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Embed several texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Identifier of the underlying model, for logs and health output.
    fn model_name(&self) -> &str;
}

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbeddingBackend {
    /// Ollama server (`POST /api/embed`).
    Ollama,
    /// Local ONNX model via fastembed (requires the `fastembed` feature).
    Fastembed,
}

/// Embedding options shared by the server and the offline builder.
#[derive(Debug, Clone, clap::Args)]
pub struct EmbeddingArgs {
    /// Embedding backend
    #[arg(
        long = "embedding-backend",
        value_enum,
        default_value_t = EmbeddingBackend::Ollama,
        env = "DOCSEARCH_EMBEDDING_BACKEND"
    )]
    pub backend: EmbeddingBackend,

    /// Embedding model name
    #[arg(
        long = "embedding-model",
        default_value = config::DEFAULT_EMBEDDING_MODEL,
        env = "DOCSEARCH_EMBEDDING_MODEL"
    )]
    pub model: String,

    /// Ollama base URL (ollama backend only)
    #[arg(long, default_value = config::DEFAULT_OLLAMA_URL, env = "OLLAMA_URL")]
    pub ollama_url: String,
}

/// Build the configured provider. `models_dir` hosts the local model cache.
pub async fn connect(
    args: &EmbeddingArgs,
    models_dir: &Path,
) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
    match args.backend {
        EmbeddingBackend::Ollama => {
            let provider = ollama::OllamaEmbedding::connect(&args.ollama_url, &args.model).await?;
            Ok(Arc::new(provider))
        }
        #[cfg(feature = "fastembed")]
        EmbeddingBackend::Fastembed => {
            let cache_dir = models_dir.join(config::EMBEDDING_CACHE_DIR);
            let model = args.model.clone();
            let provider = tokio::task::spawn_blocking(move || {
                self::fastembed::FastEmbedProvider::new(&model, cache_dir)
            })
            .await
            .map_err(|e| EmbeddingError::Backend(e.to_string()))??;
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "fastembed"))]
        EmbeddingBackend::Fastembed => {
            let _ = models_dir;
            Err(EmbeddingError::Config(
                "built without the `fastembed` feature".to_string(),
            ))
        }
    }
}
