//! Local sentence encoder backed by fastembed (ONNX runtime).
//!
//! Model files are downloaded once into the cache directory under the models
//! dir and reused on later starts.

use super::{EmbeddingError, EmbeddingProvider, EmbeddingResult};
use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// In-process embedding model.
#[derive(Clone)]
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
}

impl FastEmbedProvider {
    /// Load `model_name` (downloading into `cache_dir` if needed). Blocking.
    pub fn new(model_name: &str, cache_dir: PathBuf) -> EmbeddingResult<Self> {
        let model_type = match model_name {
            "all-minilm" | "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
                EmbeddingModel::AllMiniLML6V2
            }
            "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
            "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
            "paraphrase-multilingual-MiniLM-L12-v2" => EmbeddingModel::ParaphraseMLMiniLML12V2,
            other => {
                return Err(EmbeddingError::Config(format!(
                    "unsupported fastembed model '{}'",
                    other
                )))
            }
        };

        let options = InitOptions::new(model_type)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);
        let text_embedding = TextEmbedding::try_new(options).map_err(|e| {
            EmbeddingError::Config(format!("failed to initialize fastembed model: {}", e))
        })?;
        tracing::info!("Loaded fastembed model {}", model_name);

        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            model_name: model_name.to_string(),
        })
    }

    fn embed_blocking(model: &Mutex<TextEmbedding>, texts: Vec<String>) -> EmbeddingResult<Vec<Vec<f32>>> {
        model
            .lock()
            .embed(texts, None)
            .map_err(|e| EmbeddingError::Backend(format!("embedding generation failed: {}", e)))
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Backend("no embedding generated".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let model = self.model.clone();
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || Self::embed_blocking(&model, texts))
            .await
            .map_err(|e| EmbeddingError::Backend(e.to_string()))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
