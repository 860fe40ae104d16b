//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use doi_checker_core::CheckConfig;

/// Check DOI links against a resolver and record redirect outcomes.
///
/// Reads `\r\n`-separated records, probes `https://<domain>/<field 5>` for
/// each, and appends `url;status;redirect;final status` lines to the output
/// file. With no flags the built-in defaults are used.
#[derive(Parser, Debug)]
#[command(name = "doi-checker")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/doi-checker/config.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input file of `\r\n`-separated records
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file to append results to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Resolver domain identifiers are appended to
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Number of concurrent workers (1-1000)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub workers: Option<u16>,

    /// Delay each worker waits between requests in milliseconds (0-60000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: Option<u64>,
}

impl Args {
    /// Returns the default log level for the verbose/quiet flags.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Applies flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut CheckConfig) {
        if let Some(input) = &self.input {
            config.input_path.clone_from(input);
        }
        if let Some(output) = &self.output {
            config.output_path.clone_from(output);
        }
        if let Some(domain) = &self.domain {
            config.domain.clone_from(domain);
        }
        if let Some(workers) = self.workers {
            config.workers = usize::from(workers);
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay = Duration::from_millis(delay_ms);
        }
    }
}
