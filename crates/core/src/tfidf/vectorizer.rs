//! Term-frequency / inverse-document-frequency vectorizer.
//!
//! Fitting builds an alphabetically ordered vocabulary and one idf weight per
//! column. Transforming text yields an L2-normalized sparse vector, so the dot
//! product of two transformed texts is their cosine similarity.

use crate::tokenizer::{tokenize, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Options fixed at fit time and persisted with the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfidfOptions {
    pub tokenizer: TokenizerConfig,
    /// Use `1 + ln(tf)` instead of the raw count.
    pub sublinear_tf: bool,
    /// Add one to document frequencies, as if an extra document held every term.
    pub smooth_idf: bool,
    /// Ignore terms appearing in fewer documents than this.
    pub min_df: u32,
    /// Keep only the most frequent terms across the corpus.
    pub max_features: Option<usize>,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            sublinear_tf: false,
            smooth_idf: true,
            min_df: 1,
            max_features: None,
        }
    }
}

/// Sparse vector with ascending column indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dot product against another sorted sparse row.
    pub fn dot(&self, indices: &[u32], values: &[f32]) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < indices.len() {
            match self.indices[i].cmp(&indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted vocabulary and idf weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub options: TfidfOptions,
    /// term → column
    pub vocabulary: HashMap<String, u32>,
    /// column → idf
    pub idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit on `texts` and return the vectorizer with one transformed row per text.
    pub fn fit_transform<'a, I>(texts: I, options: TfidfOptions) -> (Self, Vec<SparseVector>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let term_counts: Vec<HashMap<String, u32>> = texts
            .into_iter()
            .map(|text| {
                let mut counts = HashMap::new();
                for token in tokenize(text, options.tokenizer).iter() {
                    *counts.entry(token.to_string()).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut df: HashMap<&str, u32> = HashMap::new();
        let mut corpus_tf: HashMap<&str, u64> = HashMap::new();
        for counts in &term_counts {
            for (term, &tf) in counts {
                *df.entry(term.as_str()).or_insert(0) += 1;
                *corpus_tf.entry(term.as_str()).or_insert(0) += tf as u64;
            }
        }

        let mut terms: Vec<&str> = df
            .iter()
            .filter(|&(_, &d)| d >= options.min_df.max(1))
            .map(|(&t, _)| t)
            .collect();
        if let Some(limit) = options.max_features {
            terms.sort_unstable_by(|a, b| corpus_tf[b].cmp(&corpus_tf[a]).then_with(|| a.cmp(b)));
            terms.truncate(limit);
        }
        terms.sort_unstable();

        let n_docs = term_counts.len() as f32;
        let vocabulary: HashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(col, &t)| (t.to_string(), col as u32))
            .collect();
        let idf: Vec<f32> = terms
            .iter()
            .map(|t| idf_weight(n_docs, df[t] as f32, options.smooth_idf))
            .collect();

        let vectorizer = Self {
            options,
            vocabulary,
            idf,
        };
        let rows = term_counts
            .iter()
            .map(|counts| vectorizer.weigh(counts.iter().map(|(t, &tf)| (t.as_str(), tf))))
            .collect();
        (vectorizer, rows)
    }

    /// Project text into the fitted space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let tokens = tokenize(text, self.options.tokenizer);
        for token in tokens.iter() {
            *counts.entry(token).or_insert(0) += 1;
        }
        self.weigh(counts.into_iter())
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    fn weigh<'a>(&self, counts: impl Iterator<Item = (&'a str, u32)>) -> SparseVector {
        let mut entries: Vec<(u32, f32)> = counts
            .filter_map(|(term, tf)| {
                let col = *self.vocabulary.get(term)?;
                let tf = if self.options.sublinear_tf {
                    1.0 + (tf as f32).ln()
                } else {
                    tf as f32
                };
                Some((col, tf * self.idf[col as usize]))
            })
            .collect();
        entries.sort_unstable_by_key(|&(col, _)| col);

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }
        SparseVector {
            indices: entries.iter().map(|&(c, _)| c).collect(),
            values: entries.iter().map(|&(_, w)| w).collect(),
        }
    }
}

fn idf_weight(n_docs: f32, df: f32, smooth: bool) -> f32 {
    if smooth {
        ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
    } else {
        (n_docs / df).ln() + 1.0
    }
}
