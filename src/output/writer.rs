//! Shared append-only result writer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::error::WriteError;
use super::format::format_line;
use crate::probe::ProbeResult;

/// Appends result lines to the output file on behalf of all workers.
///
/// A single handle is opened on first use and kept for the whole run. Every
/// append holds the lock across open-if-needed, write and flush, so lines from
/// different workers never interleave. A failed write drops the handle and the
/// next append reopens the file.
///
/// Clones share the same handle and lock.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    path: Arc<PathBuf>,
    file: Arc<Mutex<Option<BufWriter<File>>>>,
}

impl ResultWriter {
    /// Creates a writer for `path`. The file is not touched until the first
    /// append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            file: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formats and appends one probe result.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if the file cannot be opened or written. The
    /// line is lost; nothing is retried.
    pub async fn append_result(&self, result: &ProbeResult) -> Result<(), WriteError> {
        self.append_line(&format_line(result)).await
    }

    /// Appends a preformatted line.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if the file cannot be opened or written.
    #[instrument(level = "trace", skip(self, line), fields(path = %self.path.display()))]
    pub async fn append_line(&self, line: &str) -> Result<(), WriteError> {
        let mut guard = self.file.lock().await;

        let mut writer = match guard.take() {
            Some(writer) => writer,
            None => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(self.path.as_path())
                    .await
                    .map_err(|e| WriteError::open(self.path.as_path(), e))?;
                debug!("opened output file");
                BufWriter::new(file)
            }
        };

        let written = async {
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await
        }
        .await;

        match written {
            Ok(()) => {
                *guard = Some(writer);
                Ok(())
            }
            Err(e) => Err(WriteError::write(self.path.as_path(), e)),
        }
    }

    /// Flushes and syncs the handle, if one is open.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Write`] if flushing or syncing fails.
    pub async fn finish(&self) -> Result<(), WriteError> {
        let mut guard = self.file.lock().await;
        if let Some(mut writer) = guard.take() {
            writer
                .flush()
                .await
                .map_err(|e| WriteError::write(self.path.as_path(), e))?;
            writer
                .get_ref()
                .sync_all()
                .await
                .map_err(|e| WriteError::write(self.path.as_path(), e))?;
        }
        Ok(())
    }
}
