//! Catalogue-page extractor.
//!
//! Parses paginated catalogue markup into records: one `article.product_pod`
//! block per book, carrying a display title, a relative detail link, a
//! currency-prefixed price, a spelled-out star rating, and a stock flag.
//! The listing pages expose no authorship, so every record carries the
//! unknown-author sentinel.

use crate::harvest::traits::SourceExtractor;
use crate::model::{Book, SourceId, UNKNOWN_AUTHOR};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// Extracts [`Book`] records from one catalogue page.
pub struct CatalogPageExtractor {
    item: Selector,
    title_link: Selector,
    price: Selector,
    rating: Selector,
    stock: Selector,
}

impl CatalogPageExtractor {
    pub fn new() -> Self {
        // Static selectors, known valid.
        Self {
            item: Selector::parse("article.product_pod").expect("static selector"),
            title_link: Selector::parse("h3 a").expect("static selector"),
            price: Selector::parse("p.price_color").expect("static selector"),
            rating: Selector::parse("p.star-rating").expect("static selector"),
            stock: Selector::parse("p.instock.availability").expect("static selector"),
        }
    }

    fn extract_item(&self, item: &ElementRef<'_>, origin: &Url) -> Option<Book> {
        let link = item.select(&self.title_link).next()?;
        let title = link.value().attr("title").unwrap_or("").to_string();
        let url = origin.join(link.value().attr("href").unwrap_or("")).ok()?;

        // A missing price element reads as the literal "0" (a zero price,
        // not an absent one).
        let price_text = item
            .select(&self.price)
            .next()
            .map(|elem| elem.text().collect::<String>())
            .unwrap_or_else(|| "0".to_string());
        let price = parse_price(&price_text)?;

        let rating = item
            .select(&self.rating)
            .next()
            .and_then(|elem| elem.value().classes().find_map(star_rating));

        let availability = if item.select(&self.stock).next().is_some() {
            "In stock"
        } else {
            "Out of stock"
        };

        Some(Book {
            title,
            author: UNKNOWN_AUTHOR.to_string(),
            price: Some(price),
            availability: availability.to_string(),
            url,
            source: SourceId::Catalog,
            isbn: None,
            rating,
            retrieved_at: Utc::now(),
        })
    }
}

impl Default for CatalogPageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for CatalogPageExtractor {
    fn source_id(&self) -> SourceId {
        SourceId::Catalog
    }

    fn extract(&self, content: &str, origin: &Url) -> Vec<Book> {
        let document = Html::parse_document(content);
        let mut books = Vec::new();
        for item in document.select(&self.item) {
            match self.extract_item(&item, origin) {
                Some(book) => books.push(book),
                None => warn!(%origin, "skipping malformed catalogue item"),
            }
        }
        books
    }
}

/// Strips the currency symbol and any mis-encoded remnant of it, then
/// parses the remainder as a non-negative price.
fn parse_price(text: &str) -> Option<f64> {
    let cleaned = text.replace('£', "").replace('Â', "");
    let value = cleaned.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Maps the spelled-out star-rating class token to its ordinal value.
/// Unrecognized labels yield `None`, not an error.
fn star_rating(label: &str) -> Option<f64> {
    match label {
        "One" => Some(1.0),
        "Two" => Some(2.0),
        "Three" => Some(3.0),
        "Four" => Some(4.0),
        "Five" => Some(5.0),
        _ => None,
    }
}
