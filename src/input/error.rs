//! Error types for input loading and record handling.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the input file. Fatal for the run.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be read.
    #[error("failed to read input file {path}: {source}")]
    Read {
        /// Path of the input file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// A record that cannot be turned into a target URL. The record is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record has fewer fields than the identifier index requires.
    #[error("record has {found} field(s); identifier field {index} is missing")]
    MissingField {
        /// Number of `;`-separated fields in the record.
        found: usize,
        /// Zero-based index of the identifier field.
        index: usize,
    },
}

impl RecordError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing_field(found: usize, index: usize) -> Self {
        Self::MissingField { found, index }
    }
}
