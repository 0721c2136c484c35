//! Ranked-list extractor.
//!
//! Parses the first ordered list on a top-downloads page into records.
//! Each entry's link text carries title and author joined by the literal
//! `" by "` separator. These items are free, so price is exactly zero and
//! availability is a fixed label.

use crate::harvest::traits::SourceExtractor;
use crate::model::{Book, SourceId, UNKNOWN_AUTHOR};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// Per-call cap on consumed list entries.
pub const MAX_ENTRIES: usize = 20;

const TITLE_AUTHOR_SEPARATOR: &str = " by ";

/// Extracts [`Book`] records from one ranked top-list page.
pub struct RankedListExtractor {
    list: Selector,
    entry: Selector,
}

impl RankedListExtractor {
    pub fn new() -> Self {
        Self {
            list: Selector::parse("ol").expect("static selector"),
            entry: Selector::parse("li > a").expect("static selector"),
        }
    }

    fn extract_entry(&self, link: &ElementRef<'_>, origin: &Url) -> Option<Book> {
        let text = link.text().collect::<String>();
        let text = text.trim();

        let (title, author) = match text.split_once(TITLE_AUTHOR_SEPARATOR) {
            Some((title, author)) => (title.trim().to_string(), author.trim().to_string()),
            None => (text.to_string(), UNKNOWN_AUTHOR.to_string()),
        };

        let url = origin.join(link.value().attr("href").unwrap_or("")).ok()?;

        Some(Book {
            title,
            author,
            price: Some(0.0),
            availability: "Free Download".to_string(),
            url,
            source: SourceId::RankedList,
            isbn: None,
            rating: None,
            retrieved_at: Utc::now(),
        })
    }
}

impl Default for RankedListExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for RankedListExtractor {
    fn source_id(&self) -> SourceId {
        SourceId::RankedList
    }

    fn extract(&self, content: &str, origin: &Url) -> Vec<Book> {
        let document = Html::parse_document(content);
        let Some(list) = document.select(&self.list).next() else {
            return Vec::new();
        };

        let mut books = Vec::new();
        for link in list.select(&self.entry).take(MAX_ENTRIES) {
            match self.extract_entry(&link, origin) {
                Some(book) => books.push(book),
                None => warn!(%origin, "skipping malformed list entry"),
            }
        }
        books
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://gutenberg.example.org/browse/scores/top").unwrap()
    }

    fn list_page(entries: &[&str]) -> String {
        let items: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, text)| format!(r#"<li><a href="/ebooks/{i}">{text}</a></li>"#))
            .collect();
        format!("<html><body><ol>{}</ol></body></html>", items.join("\n"))
    }

    #[test]
    fn separator_splits_title_and_author_trimmed() {
        let html = list_page(&["Frankenstein by Mary Wollstonecraft Shelley"]);

        let books = RankedListExtractor::new().extract(&html, &origin());

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Frankenstein");
        assert_eq!(books[0].author, "Mary Wollstonecraft Shelley");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_from_both_halves() {
        let html = list_page(&["  Moby Dick  by  Herman Melville  "]);

        let books = RankedListExtractor::new().extract(&html, &origin());

        assert_eq!(books[0].title, "Moby Dick");
        assert_eq!(books[0].author, "Herman Melville");
    }

    #[test]
    fn missing_separator_keeps_whole_text_as_title() {
        let html = list_page(&["Beowulf"]);

        let books = RankedListExtractor::new().extract(&html, &origin());

        assert_eq!(books[0].title, "Beowulf");
        assert_eq!(books[0].author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn entries_are_free_downloads() {
        let html = list_page(&["Dracula by Bram Stoker"]);

        let books = RankedListExtractor::new().extract(&html, &origin());

        assert_eq!(books[0].price, Some(0.0));
        assert_eq!(books[0].availability, "Free Download");
        assert_eq!(books[0].source, SourceId::RankedList);
        assert_eq!(books[0].isbn, None);
        assert_eq!(books[0].rating, None);
    }

    #[test]
    fn entry_links_resolve_against_origin() {
        let html = list_page(&["Dracula by Bram Stoker"]);

        let books = RankedListExtractor::new().extract(&html, &origin());

        assert_eq!(books[0].url.as_str(), "https://gutenberg.example.org/ebooks/0");
    }

    #[test]
    fn consumes_at_most_twenty_entries() {
        let entries: Vec<String> = (0..25).map(|i| format!("Book {i} by Author {i}")).collect();
        let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
        let html = list_page(&refs);

        let books = RankedListExtractor::new().extract(&html, &origin());

        assert_eq!(books.len(), MAX_ENTRIES);
        assert_eq!(books[0].title, "Book 0");
        assert_eq!(books[19].title, "Book 19");
    }

    #[test]
    fn page_without_ordered_list_yields_empty() {
        let books = RankedListExtractor::new()
            .extract("<html><body><ul><li><a href=\"/x\">Not ranked</a></li></ul></body></html>", &origin());

        assert!(books.is_empty());
    }

    #[test]
    fn only_first_ordered_list_is_consumed() {
        let html = r#"<html><body>
            <ol><li><a href="/ebooks/1">Emma by Jane Austen</a></li></ol>
            <ol><li><a href="/ebooks/2">Second List Entry</a></li></ol>
        </body></html>"#;

        let books = RankedListExtractor::new().extract(html, &origin());

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Emma");
    }
}
