use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const PLACEHOLDER_INFO_URL: &str = "#";

/// A book as returned by the catalog.
///
/// Fields are private: a record is never mutated after it has been built.
/// Deserialization goes through [`BookRecord::new`], so records sent by clients
/// get the same fallbacks as records built from catalog results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(from = "BookRecordFields")]
pub struct BookRecord {
    title: String,
    authors: Vec<String>,
    description: Option<String>,
    thumbnail_url: Option<String>,
    info_url: String,
}

#[derive(Deserialize, JsonSchema)]
struct BookRecordFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    info_url: Option<String>,
}

impl From<BookRecordFields> for BookRecord {
    fn from(fields: BookRecordFields) -> Self {
        BookRecord::new(
            fields.title,
            fields.authors,
            fields.description,
            fields.thumbnail_url,
            fields.info_url,
        )
    }
}

impl BookRecord {
    /// Builds a record, applying the fallbacks for missing fields.
    pub fn new(
        title: Option<String>,
        authors: Option<Vec<String>>,
        description: Option<String>,
        thumbnail_url: Option<String>,
        info_url: Option<String>,
    ) -> Self {
        let authors = match authors {
            Some(authors) if !authors.is_empty() => authors,
            _ => vec![UNKNOWN_AUTHOR.to_string()],
        };

        Self {
            title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors,
            description,
            thumbnail_url: thumbnail_url.filter(|url| !url.is_empty()),
            info_url: info_url.unwrap_or_else(|| PLACEHOLDER_INFO_URL.to_string()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    /// The identity used to detect duplicates.
    pub fn dedup_key(&self) -> DedupKey<'_> {
        DedupKey {
            title: &self.title,
            authors: &self.authors,
            info_url: &self.info_url,
        }
    }
}

/// Identifying fields of a [`BookRecord`].
///
/// Two books with equal keys are the same book, whatever their description,
/// thumbnail or the time they were saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DedupKey<'a> {
    title: &'a str,
    authors: &'a [String],
    info_url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back() {
        let book = BookRecord::new(None, None, None, None, None);

        assert_eq!(book.title(), UNKNOWN_TITLE);
        assert_eq!(book.authors(), [UNKNOWN_AUTHOR.to_string()]);
        assert_eq!(book.description(), None);
        assert_eq!(book.thumbnail_url(), None);
        assert_eq!(book.info_url(), PLACEHOLDER_INFO_URL);
    }

    #[test]
    fn empty_author_list_counts_as_missing() {
        let book = BookRecord::new(Some("Dune".into()), Some(vec![]), None, None, None);

        assert_eq!(book.authors(), [UNKNOWN_AUTHOR.to_string()]);
    }

    #[test]
    fn dedup_key_ignores_description_and_thumbnail() {
        let a = BookRecord::new(
            Some("Dune".into()),
            Some(vec!["Frank Herbert".into()]),
            Some("Spice".into()),
            None,
            Some("https://books.example/dune".into()),
        );
        let b = BookRecord::new(
            Some("Dune".into()),
            Some(vec!["Frank Herbert".into()]),
            None,
            Some("https://img.example/dune.jpg".into()),
            Some("https://books.example/dune".into()),
        );

        assert_ne!(a, b);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn deserialized_record_gets_fallbacks() {
        let book: BookRecord =
            serde_json::from_str(r#"{"authors":[],"thumbnail_url":""}"#).unwrap();

        assert_eq!(book, BookRecord::new(None, None, None, None, None));
    }

    #[test]
    fn deserialized_record_matches_catalog_record() {
        let from_client: BookRecord = serde_json::from_str(
            r#"{"title":"Dune","authors":["Frank Herbert"],"info_url":"https://books.example/dune"}"#,
        )
        .unwrap();
        let from_catalog = BookRecord::new(
            Some("Dune".into()),
            Some(vec!["Frank Herbert".into()]),
            None,
            None,
            Some("https://books.example/dune".into()),
        );

        assert_eq!(from_client.dedup_key(), from_catalog.dedup_key());
    }
}
