//! Aggregate views over a harvested record collection.
//!
//! Both operations are pure: they take a read-only view of the immutable
//! post-harvest collection and build fresh outputs.

use crate::model::{Book, SourceId};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Counts records per source. Key order is not guaranteed.
pub fn source_counts(records: &[Book]) -> HashMap<SourceId, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.source).or_insert(0) += 1;
    }
    counts
}

/// Groups priced records by exact title for cross-source comparison.
///
/// Records without a price are excluded entirely. Titles are compared
/// byte-for-byte: case or whitespace variants form distinct groups. Each
/// group is sorted ascending by price; the sort is stable, so repeated
/// grouping over the same collection yields identical contents and order.
///
/// Singleton groups carry no comparative value but are still returned;
/// display callers typically filter to groups with at least two members.
pub fn price_comparison(records: &[Book]) -> HashMap<String, Vec<Book>> {
    let mut groups: HashMap<String, Vec<Book>> = HashMap::new();
    for record in records.iter().filter(|record| record.price.is_some()) {
        groups
            .entry(record.title.clone())
            .or_default()
            .push(record.clone());
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNKNOWN_AUTHOR;
    use chrono::Utc;
    use url::Url;

    fn book(title: &str, price: Option<f64>, source: SourceId) -> Book {
        Book {
            title: title.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            price,
            availability: "In stock".to_string(),
            url: Url::parse("https://books.example.com/x").unwrap(),
            source,
            isbn: None,
            rating: None,
            retrieved_at: Utc::now(),
        }
    }

    #[test]
    fn source_counts_tallies_per_source() {
        let records = vec![
            book("A", Some(1.0), SourceId::Catalog),
            book("B", Some(2.0), SourceId::Catalog),
            book("C", None, SourceId::SearchApi),
            book("D", Some(0.0), SourceId::RankedList),
        ];

        let counts = source_counts(&records);

        assert_eq!(counts.get(&SourceId::Catalog), Some(&2));
        assert_eq!(counts.get(&SourceId::SearchApi), Some(&1));
        assert_eq!(counts.get(&SourceId::RankedList), Some(&1));
    }

    #[test]
    fn source_counts_of_empty_collection_is_empty() {
        assert!(source_counts(&[]).is_empty());
    }

    #[test]
    fn identical_titles_group_together_sorted_by_price() {
        let records = vec![
            book("Clean Code", Some(34.50), SourceId::Catalog),
            book("Clean Code", Some(29.99), SourceId::RankedList),
        ];

        let groups = price_comparison(&records);

        let group = &groups["Clean Code"];
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].price, Some(29.99));
        assert_eq!(group[1].price, Some(34.50));
    }

    #[test]
    fn title_case_variants_form_distinct_groups() {
        let records = vec![
            book("Clean Code", Some(29.99), SourceId::Catalog),
            book("Clean Code", Some(34.50), SourceId::RankedList),
            book("Clean code", Some(19.99), SourceId::Catalog),
        ];

        let groups = price_comparison(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Clean Code"].len(), 2);
        assert_eq!(groups["Clean code"].len(), 1);
    }

    #[test]
    fn unpriced_records_are_excluded_entirely() {
        let records = vec![
            book("Dune", None, SourceId::SearchApi),
            book("Dune", Some(12.00), SourceId::Catalog),
        ];

        let groups = price_comparison(&records);

        assert_eq!(groups["Dune"].len(), 1);
        assert_eq!(groups["Dune"][0].source, SourceId::Catalog);
    }

    #[test]
    fn collection_of_only_unpriced_records_yields_no_groups() {
        let records = vec![
            book("A", None, SourceId::SearchApi),
            book("B", None, SourceId::SearchApi),
        ];

        assert!(price_comparison(&records).is_empty());
    }

    #[test]
    fn grouping_is_idempotent_over_the_same_collection() {
        let records = vec![
            book("Clean Code", Some(34.50), SourceId::Catalog),
            book("Clean Code", Some(29.99), SourceId::RankedList),
            // Equal prices: the stable sort keeps harvest order.
            book("Emma", Some(5.00), SourceId::Catalog),
            book("Emma", Some(5.00), SourceId::RankedList),
        ];

        let first = price_comparison(&records);
        let second = price_comparison(&records);

        assert_eq!(first, second);
        assert_eq!(first["Emma"][0].source, SourceId::Catalog);
        assert_eq!(second["Emma"][0].source, SourceId::Catalog);
    }
}
