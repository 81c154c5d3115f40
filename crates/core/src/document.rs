//! Core document types for docsearch.
//!
//! A `DocumentRecord` is one row of a document table: the display fields
//! returned by every search strategy plus the raw authors value. Tables come
//! from an offline pipeline, so deserialization is lenient: missing text
//! fields default to `""`, `null` or numeric values are rendered as text, and
//! an authors value of any JSON shape is accepted.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authors as stored in a document table.
///
/// The pipeline writes either a real JSON list or the textual form of a list
/// literal (`"['A', 'B']"`). See [`crate::authors::normalize_authors`].
///
/// Any other JSON value still deserializes, so one bad row cannot make a
/// whole table unloadable: list elements that are `null` or nested are
/// dropped, scalars are kept as text, and a non-list value becomes `Text`
/// (which then fails list parsing and takes the caller's fallback).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuthorsField {
    /// A JSON array of names.
    List(Vec<String>),
    /// Text that should contain a list literal.
    Text(String),
    /// Absent or `null`.
    #[default]
    Missing,
}

/// A stored document record, addressed by its position in the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "abstract", default, deserialize_with = "lenient_string")]
    pub abstract_text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published: String,
    #[serde(default)]
    pub authors: AuthorsField,
}

impl<'de> Deserialize<'de> for AuthorsField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(AuthorsField::from)
    }
}

impl From<serde_json::Value> for AuthorsField {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => AuthorsField::Missing,
            Value::String(s) => AuthorsField::Text(s),
            Value::Array(items) => AuthorsField::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            other => AuthorsField::Text(other.to_string()),
        }
    }
}

impl DocumentRecord {
    /// Text fed to the lexical models at fit time.
    pub fn indexable_text(&self) -> String {
        match (self.title.is_empty(), self.abstract_text.is_empty()) {
            (false, false) => format!("{} {}", self.title, self.abstract_text),
            (false, true) => self.title.clone(),
            _ => self.abstract_text.clone(),
        }
    }
}

/// Accepts strings, numbers, booleans and `null`; everything becomes text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientVisitor;

    impl<'de> de::Visitor<'de> for LenientVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.is_nan() {
                Ok(String::new())
            } else {
                Ok(v.to_string())
            }
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<String, D2::Error> {
            d.deserialize_any(LenientVisitor)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let rec: DocumentRecord = serde_json::from_str(
            r#"{"title":"T","abstract":"A","url":"u","published":"2021-01-01","authors":["X"]}"#,
        )
        .unwrap();
        assert_eq!(rec.title, "T");
        assert_eq!(rec.abstract_text, "A");
        assert_eq!(rec.authors, AuthorsField::List(vec!["X".into()]));
    }

    #[test]
    fn test_deserialize_lenient_fields() {
        let rec: DocumentRecord =
            serde_json::from_str(r#"{"title":null,"published":2020,"authors":"['A']"}"#).unwrap();
        assert_eq!(rec.title, "");
        assert_eq!(rec.published, "2020");
        assert_eq!(rec.url, "");
        assert_eq!(rec.authors, AuthorsField::Text("['A']".into()));
    }

    #[test]
    fn test_missing_and_null_authors() {
        let rec: DocumentRecord = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(rec.authors, AuthorsField::Missing);
        let rec: DocumentRecord = serde_json::from_str(r#"{"authors":null}"#).unwrap();
        assert_eq!(rec.authors, AuthorsField::Missing);
    }

    #[test]
    fn test_malformed_authors_do_not_fail_the_table() {
        let recs: Vec<DocumentRecord> = serde_json::from_str(
            r#"[{"title":"ok","authors":["A"]},{"title":"bad","authors":["B", null, {"x":1}, 7]},{"title":"num","authors":42}]"#,
        )
        .unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].authors, AuthorsField::List(vec!["A".into()]));
        assert_eq!(
            recs[1].authors,
            AuthorsField::List(vec!["B".into(), "7".into()])
        );
        assert_eq!(recs[2].authors, AuthorsField::Text("42".into()));

        let rec: DocumentRecord = serde_json::from_str(r#"{"authors":{"name":"A"}}"#).unwrap();
        assert!(matches!(rec.authors, AuthorsField::Text(_)));
    }

    #[test]
    fn test_indexable_text() {
        let mut rec = DocumentRecord {
            title: "Title".into(),
            abstract_text: "Body".into(),
            ..Default::default()
        };
        assert_eq!(rec.indexable_text(), "Title Body");
        rec.abstract_text.clear();
        assert_eq!(rec.indexable_text(), "Title");
    }
}
