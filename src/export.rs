//! Export collaborators.
//!
//! Persist the final immutable record collection outside the core: a
//! delimited tabular form and a structured JSON form. An empty collection
//! is a no-op with a warning, not an error.

use crate::model::Book;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while writing an export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O failure on the destination file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the collection as a delimited table.
///
/// Column order is fixed by the [`Book`] field order: {title, author,
/// price, availability, url, source, isbn, rating, retrieved_at}.
///
/// # Errors
///
/// Returns [`ExportError`] if the destination cannot be written.
pub fn write_csv(records: &[Book], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        warn!(path = %path.display(), "no records to export");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), records = records.len(), "wrote CSV export");
    Ok(())
}

/// Writes the collection as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns [`ExportError`] if the destination cannot be written.
pub fn write_json(records: &[Book], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        warn!(path = %path.display(), "no records to export");
        return Ok(());
    }

    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)?;

    info!(path = %path.display(), records = records.len(), "wrote JSON export");
    Ok(())
}
