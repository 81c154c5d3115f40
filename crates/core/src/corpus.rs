//! Document tables and metadata lookup.
//!
//! A `Corpus` is the read-only table of [`DocumentRecord`]s aligned with a
//! model's internal positions. [`Corpus::resolve`] turns ranked positions into
//! display records with normalized authors, skipping positions the table does
//! not cover.

use crate::authors::{normalize_authors, AuthorsFallback};
use crate::document::DocumentRecord;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// A matched document projected to its display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDocument {
    pub title: String,
    pub abstract_text: String,
    pub url: String,
    pub published: String,
    pub authors: Vec<String>,
    /// Strategy-specific relevance (similarity, BM25 score or distance).
    pub score: f32,
}

/// Read-only document table indexed by position.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<DocumentRecord>,
}

impl Corpus {
    pub fn new(documents: Vec<DocumentRecord>) -> Self {
        Self { documents }
    }

    /// Load a JSON array of document records.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let documents: Vec<DocumentRecord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        tracing::info!("Loaded {} documents from {:?}", documents.len(), path);
        Ok(Self { documents })
    }

    /// Write the table as a JSON array (temp file + rename).
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &self.documents).map_err(io::Error::other)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&DocumentRecord> {
        self.documents.get(position)
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Map ranked `(position, score)` pairs to display records, preserving order.
    /// Positions outside the table are skipped.
    pub fn resolve(&self, hits: &[(u32, f32)], fallback: AuthorsFallback) -> Vec<ResolvedDocument> {
        hits.iter()
            .filter_map(|&(position, score)| {
                let Some(doc) = self.documents.get(position as usize) else {
                    tracing::debug!(
                        "Skipping position {} outside document table of {}",
                        position,
                        self.documents.len()
                    );
                    return None;
                };
                Some(ResolvedDocument {
                    title: doc.title.clone(),
                    abstract_text: doc.abstract_text.clone(),
                    url: doc.url.clone(),
                    published: doc.published.clone(),
                    authors: normalize_authors(&doc.authors, fallback),
                    score,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::AuthorsField;

    fn sample() -> Corpus {
        Corpus::new(vec![
            DocumentRecord {
                title: "First".into(),
                authors: AuthorsField::Text("['A', 'B']".into()),
                ..Default::default()
            },
            DocumentRecord {
                title: "Second".into(),
                authors: AuthorsField::Text("not a list".into()),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_resolve_preserves_order_and_normalizes() {
        let corpus = sample();
        let out = corpus.resolve(&[(1, 0.9), (0, 0.5)], AuthorsFallback::Empty);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Second");
        assert!(out[0].authors.is_empty());
        assert_eq!(out[1].authors, vec!["A", "B"]);
        assert_eq!(out[1].score, 0.5);
    }

    #[test]
    fn test_resolve_skips_out_of_range() {
        let corpus = sample();
        let out = corpus.resolve(&[(7, 1.0), (0, 0.4), (2, 0.1)], AuthorsFallback::Verbatim);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "First");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        sample().save(&path).unwrap();
        let loaded = Corpus::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(1).unwrap().title, "Second");
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = Corpus::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_tolerates_malformed_authors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            br#"[{"title":"ok","authors":["A"]},{"title":"bad","authors":["B", null]},{"title":"num","authors":42}]"#,
        )
        .unwrap();
        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 3);

        let lexical = corpus.resolve(&[(1, 1.0), (2, 0.5)], AuthorsFallback::Empty);
        assert_eq!(lexical[0].authors, vec!["B"]);
        assert!(lexical[1].authors.is_empty());
        let dense = corpus.resolve(&[(2, 0.1)], AuthorsFallback::Verbatim);
        assert_eq!(dense[0].authors, vec!["42"]);
    }
}
