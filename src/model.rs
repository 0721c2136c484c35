use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Author sentinel used when a source does not expose authorship.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One normalized book record produced by a source extractor.
///
/// Field order matches the CSV export column order:
/// {title, author, price, availability, url, source, isbn, rating,
/// retrieved_at}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Display title. May be empty when the source markup is malformed.
    pub title: String,

    /// First listed author, or [`UNKNOWN_AUTHOR`] when the source has none.
    pub author: String,

    /// Price in a single currency unit. `None` when the source provides
    /// no pricing at all (distinct from a price of zero).
    pub price: Option<f64>,

    /// Free-form availability label, per source.
    pub availability: String,

    /// Absolute URL of the record. Relative links are resolved against
    /// the fetched page's own URL before construction.
    pub url: Url,

    /// Which upstream produced this record.
    pub source: SourceId,

    /// First listed ISBN, when the source exposes one.
    pub isbn: Option<String>,

    /// Rating on the source's own scale. Catalogue pages yield 1.0–5.0
    /// stars; the search API yields its upstream average. No cross-source
    /// normalization is applied.
    pub rating: Option<f64>,

    /// When this record was extracted.
    pub retrieved_at: DateTime<Utc>,
}

/// Closed set of upstream sources known at orchestration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    /// Paginated catalogue pages (HTML item blocks).
    Catalog,
    /// JSON search API (document list).
    SearchApi,
    /// Ranked top-list page (ordered linked entries).
    RankedList,
}

impl SourceId {
    /// Stable label, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Catalog => "catalog",
            SourceId::SearchApi => "search-api",
            SourceId::RankedList => "ranked-list",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
