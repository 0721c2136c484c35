//! Search-API extractor.
//!
//! Decodes a JSON search response into records. The upstream carries no
//! pricing, so every record's price is absent (never zero). At most
//! [`MAX_DOCS`] documents are consumed per call.

use crate::harvest::traits::SourceExtractor;
use crate::model::{Book, SourceId, UNKNOWN_AUTHOR};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use url::Url;

/// Per-call cap on consumed result documents.
pub const MAX_DOCS: usize = 20;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    #[serde(default)]
    ratings_average: Option<f64>,
    /// Work path relative to the API host, e.g. `/works/OL45804W`.
    #[serde(default)]
    key: Option<String>,
}

/// Extracts [`Book`] records from one JSON search response.
pub struct SearchApiExtractor;

impl SearchApiExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SearchApiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for SearchApiExtractor {
    fn source_id(&self) -> SourceId {
        SourceId::SearchApi
    }

    fn extract(&self, content: &str, origin: &Url) -> Vec<Book> {
        let response: SearchResponse = match serde_json::from_str(content) {
            Ok(response) => response,
            Err(err) => {
                warn!(%origin, error = %err, "undecodable search response");
                return Vec::new();
            }
        };

        response
            .docs
            .into_iter()
            .take(MAX_DOCS)
            .map(|doc| {
                // The work key is a path relative to the API host; a doc
                // without one falls back to the query URL itself.
                let url = doc
                    .key
                    .as_deref()
                    .and_then(|key| origin.join(key).ok())
                    .unwrap_or_else(|| origin.clone());

                let title = doc.title.unwrap_or_else(|| "Unknown".to_string());
                let author = doc
                    .author_name
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                let isbn = doc.isbn.into_iter().next();

                Book {
                    title,
                    author,
                    price: None,
                    availability: "Check Open Library".to_string(),
                    url,
                    source: SourceId::SearchApi,
                    isbn,
                    rating: doc.ratings_average,
                    retrieved_at: Utc::now(),
                }
            })
            .collect()
    }
}
