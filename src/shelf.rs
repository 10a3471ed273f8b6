use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::book::BookRecord;

/// A [`BookRecord`] the user flagged as interesting.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SavedBook {
    #[serde(flatten)]
    book: BookRecord,
    added_at: DateTime<Utc>,
}

impl SavedBook {
    pub fn book(&self) -> &BookRecord {
        &self.book
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// Append-only list of saved books, deduplicated by [`crate::book::DedupKey`].
#[derive(Debug, Default)]
pub struct SavedSet {
    books: Vec<SavedBook>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves `book` unless an equal book is already saved.
    ///
    /// Returns `true` if the book was appended.
    pub fn add(&mut self, book: BookRecord) -> bool {
        self.add_at(book, Utc::now())
    }

    fn add_at(&mut self, book: BookRecord, added_at: DateTime<Utc>) -> bool {
        let key = book.dedup_key();

        if self
            .books
            .iter()
            .any(|saved| saved.book.dedup_key() == key)
        {
            tracing::debug!(title = book.title(), "Book already saved");

            return false;
        }

        tracing::debug!(title = book.title(), "Saving book");

        self.books.push(SavedBook { book, added_at });

        true
    }

    /// Saved books, oldest first.
    pub fn all(&self) -> &[SavedBook] {
        &self.books
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn book(title: &str) -> BookRecord {
        BookRecord::new(
            Some(title.to_string()),
            Some(vec!["Someone".to_string()]),
            None,
            None,
            Some(format!("https://books.example/{title}")),
        )
    }

    #[test]
    fn adding_the_same_book_twice_keeps_one_entry() {
        let mut set = SavedSet::new();
        let now = Utc::now();

        assert!(set.add_at(book("A"), now));
        assert!(!set.add_at(book("A"), now + Duration::seconds(5)));

        assert_eq!(set.all().len(), 1);
        assert_eq!(set.all()[0].added_at(), now);
    }

    #[test]
    fn duplicates_with_different_metadata_are_rejected() {
        let mut set = SavedSet::new();
        let with_description = BookRecord::new(
            Some("A".into()),
            Some(vec!["Someone".into()]),
            Some("A longer description".into()),
            Some("https://img.example/a.jpg".into()),
            Some("https://books.example/A".into()),
        );

        assert!(set.add(book("A")));
        assert!(!set.add(with_description));
        assert_eq!(set.all().len(), 1);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut set = SavedSet::new();

        set.add(book("A"));
        set.add(book("B"));
        set.add(book("C"));

        let titles: Vec<_> = set.all().iter().map(|saved| saved.book().title()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn same_title_by_other_authors_is_a_different_book() {
        let mut set = SavedSet::new();
        let other = BookRecord::new(
            Some("A".into()),
            Some(vec!["Someone Else".into()]),
            None,
            None,
            Some("https://books.example/A".into()),
        );

        assert!(set.add(book("A")));
        assert!(set.add(other));
        assert_eq!(set.all().len(), 2);
    }
}
