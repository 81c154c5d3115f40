//! Inverted index for BM25 full-text search.
//!
//! Maps terms to postings lists (document position + term frequency) and
//! tracks per-document lengths for length normalization. Positions are u32
//! to keep postings compact.

use crate::tokenizer::{tokenize, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entry in a term's postings list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Document position in the corpus.
    pub doc_id: u32,
    /// Number of times the term appears in this document.
    pub term_frequency: u32,
}

/// Inverted index mapping terms to postings lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    /// term → list of postings, ascending by doc_id
    pub index: HashMap<String, Vec<Posting>>,
    /// position → document length (number of tokens)
    pub doc_lengths: Vec<u32>,
    /// Sum of all document lengths (for average calculation)
    pub total_doc_length: u64,
}

impl InvertedIndex {
    /// Creates a new empty inverted index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next document; its position is the current document count.
    pub fn push_document(&mut self, text: &str, tokenizer: TokenizerConfig) -> u32 {
        let doc_id = self.doc_lengths.len() as u32;
        let tokens = tokenize(text, tokenizer);
        let doc_len = tokens.len() as u32;
        self.doc_lengths.push(doc_len);
        self.total_doc_length += doc_len as u64;

        let mut tf_map: HashMap<&str, u32> = HashMap::new();
        for token in tokens.iter() {
            *tf_map.entry(token).or_insert(0) += 1;
        }

        for (term, tf) in tf_map {
            self.index
                .entry(term.to_string())
                .or_default()
                .push(Posting {
                    doc_id,
                    term_frequency: tf,
                });
        }
        doc_id
    }

    /// Number of indexed documents, including empty ones.
    pub fn doc_count(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Returns the average document length across all indexed documents.
    pub fn average_doc_length(&self) -> f32 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        self.total_doc_length as f32 / self.doc_lengths.len() as f32
    }

    /// Check structural invariants after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        let total: u64 = self.doc_lengths.iter().map(|&l| l as u64).sum();
        if total != self.total_doc_length {
            return Err(format!(
                "total_doc_length {} != sum of doc_lengths {}",
                self.total_doc_length, total
            ));
        }
        let n = self.doc_lengths.len();
        for (term, postings) in &self.index {
            if let Some(p) = postings.iter().find(|p| p.doc_id as usize >= n) {
                return Err(format!(
                    "posting for '{}' references doc {} >= doc_count {}",
                    term, p.doc_id, n
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOP: TokenizerConfig = TokenizerConfig { stop_words: true };

    #[test]
    fn test_push_document_updates_index() {
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.push_document("the quick brown fox", STOP), 0);
        assert_eq!(idx.doc_count(), 1);
        assert!(idx.index.contains_key("quick"));
        assert!(idx.index.contains_key("fox"));
        assert!(!idx.index.contains_key("the"));
    }

    #[test]
    fn test_term_frequency() {
        let mut idx = InvertedIndex::new();
        idx.push_document("hello hello hello world", STOP);
        let postings = idx.index.get("hello").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].term_frequency, 3);
    }

    #[test]
    fn test_positions_are_sequential() {
        let mut idx = InvertedIndex::new();
        idx.push_document("rust programming language", STOP);
        idx.push_document("", STOP);
        assert_eq!(idx.push_document("python programming language", STOP), 2);
        let ids: Vec<u32> = idx.index["programming"].iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(idx.doc_lengths[1], 0);
    }

    #[test]
    fn test_average_doc_length() {
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.average_doc_length(), 0.0);
        idx.push_document("one two three", STOP);
        idx.push_document("four five six seven eight", STOP);
        assert_eq!(idx.average_doc_length(), 4.0);
    }

    #[test]
    fn test_validate_detects_dangling_posting() {
        let mut idx = InvertedIndex::new();
        idx.push_document("hello world", STOP);
        assert!(idx.validate().is_ok());
        idx.index.get_mut("hello").unwrap()[0].doc_id = 9;
        assert!(idx.validate().is_err());
    }
}
