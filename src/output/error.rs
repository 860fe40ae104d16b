//! Error types for the result writer.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to persist one result line. The line is dropped; the run continues.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The output file could not be opened for appending.
    #[error("failed to open output file {path}: {source}")]
    Open {
        /// Path of the output file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the line failed.
    #[error("failed to write to output file {path}: {source}")]
    Write {
        /// Path of the output file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Creates an open error.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
