//! TF-IDF retrieval: fitted vectorizer plus document-term matrix.
//!
//! Queries are transformed into the fitted space and ranked by cosine
//! similarity against every document row.

/// CSR document-term matrix.
pub mod matrix;
/// Vocabulary, idf weights and sparse transforms.
pub mod vectorizer;

pub use matrix::CsrMatrix;
pub use vectorizer::{SparseVector, TfidfOptions, TfidfVectorizer};

use crate::persistence;
use crate::ranking::top_k;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// A fitted TF-IDF model: one L2-normalized matrix row per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfModel {
    pub vectorizer: TfidfVectorizer,
    pub matrix: CsrMatrix,
}

impl TfidfModel {
    /// Fit on the given document texts (one per corpus position).
    pub fn fit<'a, I>(texts: I, options: TfidfOptions) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(texts, options);
        let matrix = CsrMatrix::from_rows(&rows, vectorizer.vocabulary_size());
        Self { vectorizer, matrix }
    }

    /// Cosine similarity of `query` against every document, top `k` first.
    pub fn search(&self, query: &str, k: usize) -> Vec<(u32, f32)> {
        let q = self.vectorizer.transform(query);
        top_k(self.matrix.dot_rows(&q), k)
    }

    pub fn document_count(&self) -> usize {
        self.matrix.n_rows()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.matrix.validate()?;
        if self.matrix.n_cols != self.vectorizer.idf.len() {
            return Err(format!(
                "matrix has {} columns but vocabulary has {} terms",
                self.matrix.n_cols,
                self.vectorizer.idf.len()
            ));
        }
        if self.vectorizer.vocabulary.len() != self.vectorizer.idf.len() {
            return Err(format!(
                "vocabulary size {} != idf length {}",
                self.vectorizer.vocabulary.len(),
                self.vectorizer.idf.len()
            ));
        }
        if let Some(col) = self
            .vectorizer
            .vocabulary
            .values()
            .find(|&&c| c as usize >= self.vectorizer.idf.len())
        {
            return Err(format!("vocabulary column {} out of range", col));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        persistence::save_artifact(self, path)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let model: Self = persistence::load_artifact(path)?;
        model.validate().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("TF-IDF model validation failed: {}", e),
            )
        })?;
        tracing::info!(
            "Loaded TF-IDF model ({} documents, {} terms)",
            model.document_count(),
            model.vectorizer.vocabulary_size()
        );
        Ok(model)
    }
}
