//! BM25 Okapi scoring engine.
//!
//! Idf per term is precomputed at fit time as
//! `ln(N - df + 0.5) - ln(df + 0.5)`; terms whose idf would be negative are
//! floored at `epsilon * average_idf`. Every document receives a score, so the
//! ranking covers the whole corpus.

use crate::bm25::inverted_index::InvertedIndex;
use crate::config;
use crate::persistence;
use crate::ranking::top_k;
use crate::tokenizer::{tokenize, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// BM25 tuning parameters, fixed at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
    pub epsilon: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: config::BM25_K1,
            b: config::BM25_B,
            epsilon: config::BM25_EPSILON,
        }
    }
}

/// A fitted BM25 scoring structure over a fixed corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bm25Index {
    pub params: Bm25Params,
    pub tokenizer: TokenizerConfig,
    pub inverted: InvertedIndex,
    /// term → idf
    pub idf: HashMap<String, f32>,
}

impl Bm25Index {
    /// Index the given document texts (one per corpus position).
    pub fn fit<'a, I>(texts: I, params: Bm25Params, tokenizer: TokenizerConfig) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut inverted = InvertedIndex::new();
        for text in texts {
            inverted.push_document(text, tokenizer);
        }

        let n = inverted.doc_count() as f32;
        let mut idf: HashMap<String, f32> = inverted
            .index
            .iter()
            .map(|(term, postings)| {
                let df = postings.len() as f32;
                (term.clone(), (n - df + 0.5).ln() - (df + 0.5).ln())
            })
            .collect();

        if !idf.is_empty() {
            let average_idf = idf.values().sum::<f32>() / idf.len() as f32;
            let floor = params.epsilon * average_idf;
            for value in idf.values_mut() {
                if *value < 0.0 {
                    *value = floor;
                }
            }
        }

        Self {
            params,
            tokenizer,
            inverted,
            idf,
        }
    }

    /// Score every document against `query`. Index `i` holds document `i`'s score.
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.inverted.doc_count()];
        let avgdl = self.inverted.average_doc_length();
        if avgdl == 0.0 {
            return scores;
        }
        let Bm25Params { k1, b, .. } = self.params;

        for token in tokenize(query, self.tokenizer).iter() {
            let (Some(postings), Some(&idf)) = (self.inverted.index.get(token), self.idf.get(token))
            else {
                continue;
            };
            for posting in postings {
                let dl = self.inverted.doc_lengths[posting.doc_id as usize] as f32;
                let tf = posting.term_frequency as f32;
                let tf_norm = (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / avgdl));
                scores[posting.doc_id as usize] += idf * tf_norm;
            }
        }
        scores
    }

    /// Top `k` documents by BM25 score.
    pub fn search(&self, query: &str, k: usize) -> Vec<(u32, f32)> {
        let scores = self.scores(query);
        top_k(scores.into_iter().enumerate().map(|(i, s)| (i as u32, s)), k)
    }

    pub fn document_count(&self) -> usize {
        self.inverted.doc_count()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.inverted.validate()?;
        if let Some(term) = self.inverted.index.keys().find(|t| !self.idf.contains_key(*t)) {
            return Err(format!("term '{}' has postings but no idf", term));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        persistence::save_artifact(self, path)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let index: Self = persistence::load_artifact(path)?;
        index.validate().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("BM25 model validation failed: {}", e),
            )
        })?;
        tracing::info!(
            "Loaded BM25 model ({} documents, {} terms)",
            index.document_count(),
            index.idf.len()
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_corpus() -> Bm25Index {
        Bm25Index::fit(
            [
                "rust programming systems language fast",
                "python programming scripting easy",
                "java enterprise programming verbose",
                "rust memory safety zero cost abstractions",
            ],
            Bm25Params::default(),
            TokenizerConfig { stop_words: true },
        )
    }

    #[test]
    fn test_scores_cover_every_document() {
        let idx = build_corpus();
        let scores = idx.scores("python memory");
        assert_eq!(scores.len(), 4);
        assert!(scores[1] > 0.0 && scores[3] > 0.0);
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_ranking_order() {
        let idx = Bm25Index::fit(
            ["rust rust rust", "rust programming", "unrelated words here"],
            Bm25Params::default(),
            TokenizerConfig::default(),
        );
        let results = idx.search("rust", 10);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 0, "doc with higher TF should rank first");
        assert_eq!(results[1].0, 1);
        assert!(results.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_negative_idf_is_floored() {
        // "common" appears in 3 of 4 docs: raw idf = ln(1.5) - ln(3.5) < 0
        let idx = Bm25Index::fit(
            ["common alpha", "common beta", "common gamma", "delta"],
            Bm25Params::default(),
            TokenizerConfig::default(),
        );
        let common = idx.idf["common"];
        assert!(common > 0.0, "negative idf should be floored, got {common}");
        let avg_raw: f32 = {
            let rare = (3.5f32).ln() - (1.5f32).ln();
            let frequent = (1.5f32).ln() - (3.5f32).ln();
            (4.0 * rare + frequent) / 5.0
        };
        assert!((common - 0.25 * avg_raw).abs() < 1e-5);
    }

    #[test]
    fn test_repeated_query_terms_count_twice() {
        let idx = build_corpus();
        let once = idx.scores("memory")[3];
        let twice = idx.scores("memory memory")[3];
        assert!(once > 0.0);
        assert!((twice - 2.0 * once).abs() < 1e-5);
    }

    #[test]
    fn test_empty_query_and_empty_index() {
        let idx = build_corpus();
        assert!(idx.scores("").iter().all(|&s| s == 0.0));
        let empty = Bm25Index::fit(Vec::<&str>::new(), Bm25Params::default(), TokenizerConfig::default());
        assert!(empty.search("rust", 5).is_empty());
    }

    #[test]
    fn test_k_truncation() {
        let idx = build_corpus();
        assert_eq!(idx.search("programming", 2).len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bm25_model.bin");
        let idx = build_corpus();
        idx.save(&path).unwrap();
        let loaded = Bm25Index::load(&path).unwrap();
        assert_eq!(loaded.search("memory safety", 2), idx.search("memory safety", 2));
    }
}
