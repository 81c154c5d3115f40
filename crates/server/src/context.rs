//! Process-wide search state.
//!
//! Every artifact is loaded once at startup into a [`SearchContext`], which is
//! then shared read-only by all handlers. A strategy whose artifacts fail to
//! load is left empty and its endpoint answers 503, unless strict mode turns
//! the failure into a startup error.

use crate::embedding::{self, EmbeddingArgs, EmbeddingError, EmbeddingProvider};
use docsearch_core::bm25::Bm25Index;
use docsearch_core::config;
use docsearch_core::corpus::Corpus;
use docsearch_core::tfidf::TfidfModel;
use docsearch_core::vector::FlatIndex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading a strategy's resources.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid artifacts: {0}")]
    Invalid(String),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl LoadError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> LoadError + '_ {
        move |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Locations of every artifact the server reads.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub models_dir: PathBuf,
    pub tfidf_model: PathBuf,
    pub tfidf_documents: PathBuf,
    pub bm25_model: PathBuf,
    pub bm25_documents: PathBuf,
    pub dense_index: PathBuf,
    pub dense_metadata: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            models_dir: dir.to_path_buf(),
            tfidf_model: dir.join(config::TFIDF_MODEL_FILE),
            tfidf_documents: dir.join(config::TFIDF_DOCUMENTS_FILE),
            bm25_model: dir.join(config::BM25_MODEL_FILE),
            bm25_documents: dir.join(config::BM25_DOCUMENTS_FILE),
            dense_index: dir.join(config::DENSE_INDEX_FILE),
            dense_metadata: dir.join(config::DENSE_METADATA_FILE),
        }
    }
}

/// A lexical model plus the document table aligned with its positions.
pub struct LexicalBackend<M> {
    pub model: M,
    pub documents: Corpus,
}

impl LexicalBackend<TfidfModel> {
    pub fn load_tfidf(model_path: &Path, documents_path: &Path) -> Result<Self, LoadError> {
        let model = TfidfModel::load(model_path).map_err(LoadError::io(model_path))?;
        let documents = Corpus::load(documents_path).map_err(LoadError::io(documents_path))?;
        warn_on_misalignment("tfidf", model.document_count(), documents.len());
        Ok(Self { model, documents })
    }
}

impl LexicalBackend<Bm25Index> {
    pub fn load_bm25(model_path: &Path, documents_path: &Path) -> Result<Self, LoadError> {
        let model = Bm25Index::load(model_path).map_err(LoadError::io(model_path))?;
        let documents = Corpus::load(documents_path).map_err(LoadError::io(documents_path))?;
        warn_on_misalignment("bm25", model.document_count(), documents.len());
        Ok(Self { model, documents })
    }
}

/// Vector index, aligned metadata and the query encoder.
pub struct DenseBackend {
    pub index: FlatIndex,
    pub documents: Corpus,
    pub embedder: Arc<dyn EmbeddingProvider>,
}

impl DenseBackend {
    /// Assemble from already-loaded parts, checking the encoder's output dimension.
    pub async fn new(
        index: FlatIndex,
        documents: Corpus,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, LoadError> {
        if documents.is_empty() {
            return Err(LoadError::Invalid("dense metadata is empty".into()));
        }
        let probe = embedder.embed("dimension probe").await?;
        if probe.len() != index.dimension() {
            return Err(LoadError::Invalid(format!(
                "embedding model '{}' produces {} dimensions, index expects {}",
                embedder.model_name(),
                probe.len(),
                index.dimension()
            )));
        }
        warn_on_misalignment("faiss", index.len(), documents.len());
        Ok(Self {
            index,
            documents,
            embedder,
        })
    }

    pub async fn load(paths: &ArtifactPaths, embedding: &EmbeddingArgs) -> Result<Self, LoadError> {
        let index = FlatIndex::load(&paths.dense_index).map_err(LoadError::io(&paths.dense_index))?;
        let documents =
            Corpus::load(&paths.dense_metadata).map_err(LoadError::io(&paths.dense_metadata))?;
        let embedder = embedding::connect(embedding, &paths.models_dir).await?;
        Self::new(index, documents, embedder).await
    }
}

/// Immutable state shared by every request.
#[derive(Default)]
pub struct SearchContext {
    pub tfidf: Option<LexicalBackend<TfidfModel>>,
    pub bm25: Option<LexicalBackend<Bm25Index>>,
    pub dense: Option<DenseBackend>,
}

impl SearchContext {
    /// Load all three strategies. With `strict`, the first failure aborts.
    pub async fn load(
        paths: &ArtifactPaths,
        embedding: &EmbeddingArgs,
        strict: bool,
    ) -> Result<Self, LoadError> {
        let tfidf = degrade(
            "tfidf",
            LexicalBackend::load_tfidf(&paths.tfidf_model, &paths.tfidf_documents),
            strict,
        )?;
        let bm25 = degrade(
            "bm25",
            LexicalBackend::load_bm25(&paths.bm25_model, &paths.bm25_documents),
            strict,
        )?;
        let dense = degrade("faiss", DenseBackend::load(paths, embedding).await, strict)?;
        Ok(Self { tfidf, bm25, dense })
    }

    pub fn all_loaded(&self) -> bool {
        self.tfidf.is_some() && self.bm25.is_some() && self.dense.is_some()
    }
}

fn degrade<T>(
    strategy: &str,
    result: Result<T, LoadError>,
    strict: bool,
) -> Result<Option<T>, LoadError> {
    match result {
        Ok(backend) => {
            tracing::info!(strategy, "Search strategy ready");
            Ok(Some(backend))
        }
        Err(e) if strict => Err(e),
        Err(e) => {
            tracing::error!(strategy, "Search strategy unavailable: {}", e);
            Ok(None)
        }
    }
}

fn warn_on_misalignment(strategy: &str, model_rows: usize, documents: usize) {
    if model_rows != documents {
        tracing::warn!(
            strategy,
            "Model covers {} documents but the table has {}; unmatched positions will be skipped",
            model_rows,
            documents
        );
    }
}
