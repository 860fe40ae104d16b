//! Run orchestration: load input, start workers, wait, report.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::check::{CheckEngine, CheckStats, EngineError};
use crate::config::{CheckConfig, ConfigError};
use crate::input::{InputError, ResolverTarget, load_records};
use crate::output::ResultWriter;
use crate::probe::{ProbeError, ResolverClient};

/// Errors that stop a run before any record is checked.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input file could not be read.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] ProbeError),

    /// The worker pool rejected its settings.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Runs one complete check over the configured input.
///
/// Per-record failures are logged and counted in the returned stats; only
/// start-up failures are returned as errors.
///
/// # Errors
///
/// Returns [`RunError`] if the configuration is invalid, the input file
/// cannot be read, or the HTTP client cannot be built.
#[instrument(skip(config), fields(input = %config.input_path.display(), output = %config.output_path.display()))]
pub async fn run_check(config: &CheckConfig) -> Result<CheckStats, RunError> {
    config.validate()?;
    info!("Starting CSV check");

    let records: Arc<[String]> = Arc::from(load_records(&config.input_path).await?);
    let client = ResolverClient::new(config.connect_timeout, config.request_timeout)?;
    let target = ResolverTarget::new(config.scheme.as_str(), &config.domain);
    let writer = ResultWriter::new(&config.output_path);
    let engine = CheckEngine::new(config.workers, config.delay)?;

    info!(
        records = records.len(),
        workers = engine.workers(),
        delay_ms = engine.delay().as_millis(),
        domain = target.domain(),
        "checking records"
    );

    let stats = engine.run(records, &client, &target, &writer).await;

    if let Err(e) = writer.finish().await {
        warn!(error = %e, "failed to flush output file");
    }

    info!(
        written = stats.written(),
        redirected = stats.redirected(),
        skipped = stats.skipped(),
        malformed = stats.malformed(),
        write_failed = stats.write_failed(),
        "Finished CSV check"
    );

    Ok(stats)
}
