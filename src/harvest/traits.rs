//! Core trait for the per-source extraction strategies.

use crate::model::{Book, SourceId};
use url::Url;

/// One extraction capability, implemented once per upstream source.
///
/// Implementations transform one fetched payload into zero or more
/// normalized [`Book`] records. The orchestrator selects an implementation
/// through its static task table, never by runtime type inspection.
///
/// # Fault tolerance
///
/// Extraction never errors past this boundary:
/// - absence of an expected page element degrades to an empty result;
/// - a malformed item is logged and skipped, dropping only that item.
///
/// Records are either fully built and emitted or dropped; an emitted
/// record is never half-populated.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the orchestrator shares them
/// across concurrently running tasks.
pub trait SourceExtractor: Send + Sync {
    /// Returns the source tag stamped on every record this extractor emits.
    fn source_id(&self) -> SourceId;

    /// Extracts records from one fetched payload.
    ///
    /// `origin` is the URL the payload was fetched from; relative links in
    /// the payload are resolved against it before being stored, so every
    /// emitted record carries an absolute URL.
    fn extract(&self, content: &str, origin: &Url) -> Vec<Book>;
}
