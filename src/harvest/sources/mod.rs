//! Source-specific extraction strategies.
//!
//! One implementation of [`SourceExtractor`](super::traits::SourceExtractor)
//! per upstream source:
//! - [`catalog`]: paginated catalogue pages (markup item blocks)
//! - [`search_api`]: JSON search API responses
//! - [`ranked`]: ranked top-list pages

pub mod catalog;
pub mod ranked;
pub mod search_api;

pub use catalog::CatalogPageExtractor;
pub use ranked::RankedListExtractor;
pub use search_api::SearchApiExtractor;
