//! Word tokenizer shared by the TF-IDF and BM25 models.
//!
//! Lowercases, splits on anything that is not alphanumeric or `_`, drops
//! single-character tokens and optionally removes English stop words. The
//! options are stored inside each fitted model so queries are tokenized
//! exactly like the corpus was. Uses one allocation per call via byte spans.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
        "here", "hers", "him", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
        "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once",
        "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so",
        "some", "such", "than", "that", "the", "their", "them", "then", "there", "these", "they",
        "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
        "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
        "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Tokenization options persisted alongside a fitted model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Remove common English stop words.
    pub stop_words: bool,
}

/// Tokenized text: owns the lowercased buffer, provides &str slices via byte spans.
pub struct Tokens {
    buffer: String,
    spans: Vec<(u32, u32)>,
}

impl Tokens {
    /// Returns an iterator over the token `&str` slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(|&(s, e)| &self.buffer[s as usize..e as usize])
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize text with the given options.
pub fn tokenize(text: &str, config: TokenizerConfig) -> Tokens {
    let buffer = text.to_lowercase();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    let keep = |token: &str| {
        token.chars().nth(1).is_some() && !(config.stop_words && STOP_WORDS.contains(token))
    };

    for (i, c) in buffer.char_indices() {
        if is_word_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            if keep(&buffer[s..i]) {
                spans.push((s as u32, i as u32));
            }
        }
    }
    if let Some(s) = start {
        if keep(&buffer[s..]) {
            spans.push((s as u32, buffer.len() as u32));
        }
    }

    Tokens { buffer, spans }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str, stop_words: bool) -> Vec<String> {
        tokenize(text, TokenizerConfig { stop_words })
            .iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            words("Deep-Learning for NLP_tasks!", false),
            vec!["deep", "learning", "for", "nlp_tasks"]
        );
    }

    #[test]
    fn test_single_characters_dropped() {
        assert_eq!(words("a b cd e", false), vec!["cd"]);
    }

    #[test]
    fn test_stop_words_optional() {
        let text = "The quick brown fox";
        assert!(words(text, false).contains(&"the".to_string()));
        let filtered = words(text, true);
        assert!(!filtered.contains(&"the".to_string()));
        assert!(filtered.contains(&"quick".to_string()));
    }

    #[test]
    fn test_unicode_tokens() {
        assert_eq!(words("Über naïve café", false), vec!["über", "naïve", "café"]);
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("   ", TokenizerConfig::default());
        assert!(tokens.is_empty());
        assert_eq!(tokens.len(), 0);
    }
}
