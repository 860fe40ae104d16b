//! CLI entry point for the doi-checker tool.

use anyhow::Result;
use clap::Parser;
use doi_checker_core::{CheckConfig, load_default_file_config, load_file_config, run_check};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = match &args.config {
        Some(path) => Some(load_file_config(path)?),
        None => load_default_file_config()?,
    };

    let mut config = CheckConfig::default();
    if let Some(file_config) = &file_config {
        config.apply_file_config(file_config);
    }
    args.apply_overrides(&mut config);
    debug!(?config, "resolved configuration");

    let stats = run_check(&config).await?;

    info!(
        written = stats.written(),
        total = stats.total(),
        output = %config.output_path.display(),
        "Check complete"
    );

    Ok(())
}
