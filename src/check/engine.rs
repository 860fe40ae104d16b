//! Stride-partitioned worker pool for checking records.
//!
//! The [`CheckEngine`] spawns a fixed number of Tokio tasks. Worker `k` of
//! `N` owns record indices `k, k+N, k+2N, …`, so every record is handled by
//! exactly one worker and no coordination is needed beyond the output lock.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use doi_checker_core::{CheckEngine, ResolverClient, ResolverTarget, ResultWriter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records: Arc<[String]> = Arc::from(vec!["1;t;a;2020;10.1000/182".to_string()]);
//! let client = ResolverClient::new(Duration::from_secs(10), Duration::from_secs(30))?;
//! let target = ResolverTarget::new("https", "dx.doi.org");
//! let writer = ResultWriter::new("./csv/output.csv");
//! let engine = CheckEngine::new(4, Duration::from_secs(3))?;
//! let stats = engine.run(records, &client, &target, &writer).await;
//! println!("written: {}, skipped: {}", stats.written(), stats.skipped());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::input::ResolverTarget;
use crate::output::ResultWriter;
use crate::probe::ResolverClient;

/// Minimum allowed worker count.
pub const MIN_WORKERS: usize = 1;

/// Maximum allowed worker count.
pub const MAX_WORKERS: usize = 1000;

/// Default worker count if not specified.
pub const DEFAULT_WORKERS: usize = 250;

/// Error type for check engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid worker count provided.
    #[error("invalid worker count {value}: must be between {MIN_WORKERS} and {MAX_WORKERS}")]
    InvalidWorkers {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Returns the record indices owned by `worker` out of `workers`.
///
/// The strides of workers `0..workers` are pairwise disjoint and together
/// cover `0..len`. A `workers` value of zero is treated as one.
pub fn stride_indices(worker: usize, workers: usize, len: usize) -> impl Iterator<Item = usize> {
    (worker..len).step_by(workers.max(1))
}

/// Counters from a check run.
///
/// Updated concurrently by all workers through atomics.
#[derive(Debug, Default)]
pub struct CheckStats {
    written: AtomicUsize,
    skipped: AtomicUsize,
    malformed: AtomicUsize,
    write_failed: AtomicUsize,
    redirected: AtomicUsize,
}

impl CheckStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records probed and written to the output file.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }

    /// Records skipped because the first request failed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Records skipped because the identifier field was missing.
    #[must_use]
    pub fn malformed(&self) -> usize {
        self.malformed.load(Ordering::SeqCst)
    }

    /// Records probed but lost because the output write failed.
    #[must_use]
    pub fn write_failed(&self) -> usize {
        self.write_failed.load(Ordering::SeqCst)
    }

    /// Probed records whose first response was a 301 or 302.
    #[must_use]
    pub fn redirected(&self) -> usize {
        self.redirected.load(Ordering::SeqCst)
    }

    /// Total records handled (written + skipped + malformed + write failed).
    #[must_use]
    pub fn total(&self) -> usize {
        self.written() + self.skipped() + self.malformed() + self.write_failed()
    }

    fn increment_written(&self) {
        self.written.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_write_failed(&self) {
        self.write_failed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_redirected(&self) {
        self.redirected.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            written: AtomicUsize::new(self.written()),
            skipped: AtomicUsize::new(self.skipped()),
            malformed: AtomicUsize::new(self.malformed()),
            write_failed: AtomicUsize::new(self.write_failed()),
            redirected: AtomicUsize::new(self.redirected()),
        }
    }
}

/// Fixed-size worker pool for checking records.
///
/// # Concurrency Model
///
/// - Exactly `workers` Tokio tasks are spawned per run, even if some own no
///   records
/// - Records, client and target are shared read-only
/// - The only shared mutable state is the [`ResultWriter`] and the stats
///
/// # Rate Limiting
///
/// After every record that issued a request, a worker sleeps `delay` before
/// moving to its next record. The limit is per worker, so the aggregate
/// request rate grows linearly with the worker count. There is no work
/// stealing: a worker whose records resolve quickly finishes early and idles.
#[derive(Debug, Clone)]
pub struct CheckEngine {
    workers: usize,
    delay: Duration,
}

impl CheckEngine {
    /// Creates a new engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWorkers`] if `workers` is outside
    /// `MIN_WORKERS..=MAX_WORKERS`.
    #[instrument(level = "debug")]
    pub fn new(workers: usize, delay: Duration) -> Result<Self, EngineError> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&workers) {
            return Err(EngineError::InvalidWorkers { value: workers });
        }

        debug!(
            workers,
            delay_ms = delay.as_millis(),
            "creating check engine"
        );

        Ok(Self { workers, delay })
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the per-worker delay between requests.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Checks every record and blocks until all workers have finished.
    ///
    /// Per-record failures never abort the run; they are logged and counted.
    #[instrument(skip(self, records, client, target, writer), fields(records = records.len(), workers = self.workers))]
    pub async fn run(
        &self,
        records: Arc<[String]>,
        client: &ResolverClient,
        target: &ResolverTarget,
        writer: &ResultWriter,
    ) -> CheckStats {
        let stats = Arc::new(CheckStats::new());
        let mut handles = Vec::with_capacity(self.workers);

        for id in 0..self.workers {
            let worker = Worker {
                id,
                workers: self.workers,
                delay: self.delay,
                records: Arc::clone(&records),
                client: client.clone(),
                target: target.clone(),
                writer: writer.clone(),
                stats: Arc::clone(&stats),
            };
            handles.push(tokio::spawn(worker.run()));
        }

        debug!(task_count = handles.len(), "waiting for workers to finish");

        for handle in handles {
            // A panicked worker loses the rest of its stride but not the run.
            if let Err(e) = handle.await {
                warn!(error = %e, "worker task panicked");
            }
        }

        info!(
            written = stats.written(),
            skipped = stats.skipped(),
            malformed = stats.malformed(),
            write_failed = stats.write_failed(),
            total = stats.total(),
            "all workers finished"
        );

        match Arc::try_unwrap(stats) {
            Ok(stats) => stats,
            Err(shared) => shared.snapshot(),
        }
    }
}

/// One worker's view of the run.
struct Worker {
    id: usize,
    workers: usize,
    delay: Duration,
    records: Arc<[String]>,
    client: ResolverClient,
    target: ResolverTarget,
    writer: ResultWriter,
    stats: Arc<CheckStats>,
}

impl Worker {
    #[instrument(skip(self), fields(worker = self.id))]
    async fn run(self) {
        let mut indices = stride_indices(self.id, self.workers, self.records.len()).peekable();
        while let Some(index) = indices.next() {
            let resolved = self.check_record(index).await;
            if resolved && !self.delay.is_zero() && indices.peek().is_some() {
                tokio::time::sleep(self.delay).await;
            }
        }
        debug!("worker finished stride");
    }

    /// Handles one record. Returns `true` if the record was resolved and the
    /// worker should pause before its next request.
    async fn check_record(&self, index: usize) -> bool {
        let row = index + 1;
        let total = self.records.len();
        let record = &self.records[index];
        info!(row, total, "checking row");

        let url = match self.target.build_url(record) {
            Ok(url) => url,
            Err(e) => {
                if record.trim().is_empty() {
                    debug!(row, "skipping empty record");
                } else {
                    warn!(row, error = %e, "skipping malformed record");
                }
                self.stats.increment_malformed();
                return false;
            }
        };
        debug!(row, url = %url, "built URL");

        let result = match self.client.probe(&url).await {
            Ok(result) => result,
            Err(e) => {
                warn!(row, url = %url, error = %e, "request failed, skipping record");
                self.stats.increment_skipped();
                return false;
            }
        };
        if result.was_redirected() {
            self.stats.increment_redirected();
        }

        match self.writer.append_result(&result).await {
            Ok(()) => {
                self.stats.increment_written();
                info!(
                    row,
                    initial_status = result.initial_status,
                    final_status = result.final_status,
                    "checked and wrote result"
                );
            }
            Err(e) => {
                self.stats.increment_write_failed();
                warn!(row, url = %url, error = %e, "failed to write result");
            }
        }
        true
    }
}
