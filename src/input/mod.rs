//! Input loading and target URL construction.
//!
//! The input file is read whole and split on the literal `\r\n` sequence.
//! Records are not validated here; a record that lacks the identifier field
//! surfaces as a [`RecordError`] when its URL is built.

mod error;
mod target;

use std::path::Path;

use tracing::{debug, instrument};

pub use error::{InputError, RecordError};
pub use target::{FIELD_SEPARATOR, IDENTIFIER_FIELD_INDEX, ResolverTarget, identifier_field};

/// Separator between records in the input file.
pub const RECORD_SEPARATOR: &str = "\r\n";

/// Reads the input file and splits it into records.
///
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the file cannot be read.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn load_records(path: &Path) -> Result<Vec<String>, InputError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| InputError::read(path, e))?;
    let records = split_records(&String::from_utf8_lossy(&bytes));
    debug!(records = records.len(), bytes = bytes.len(), "loaded input");
    Ok(records)
}

/// Splits raw input into records on `\r\n`.
///
/// Every segment is kept, so a trailing separator yields a final empty
/// record and empty input yields one empty record.
#[must_use]
pub fn split_records(text: &str) -> Vec<String> {
    text.split(RECORD_SEPARATOR).map(str::to_string).collect()
}
