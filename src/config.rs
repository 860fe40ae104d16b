//! Run configuration for the checker.
//!
//! [`CheckConfig`] is built once at startup from built-in defaults, an
//! optional config file ([`FileConfig`]) and command-line overrides, then
//! passed by reference into [`run_check`](crate::run_check).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use thiserror::Error;

use crate::check::{DEFAULT_WORKERS, MAX_WORKERS, MIN_WORKERS};

/// Default input file, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "./csv/input.csv";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "./csv/output.csv";

/// Default resolver domain.
pub const DEFAULT_DOMAIN: &str = "dx.doi.org";

/// Default URL scheme for built target URLs.
pub const DEFAULT_SCHEME: &str = "https";

/// Default per-worker delay between requests (3 seconds).
pub const DEFAULT_DELAY_MS: u64 = 3_000;

/// Maximum per-worker delay (60 seconds).
pub const MAX_DELAY_MS: u64 = 60_000;

/// Default HTTP connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total HTTP request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const MAX_TIMEOUT_SECS: u64 = 3_600;

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Worker count outside the supported range.
    #[error("invalid worker count {value}: must be between {MIN_WORKERS} and {MAX_WORKERS}")]
    InvalidWorkers {
        /// The rejected value.
        value: usize,
    },

    /// Per-worker delay above the maximum.
    #[error("invalid delay {value_ms}ms: must be at most {MAX_DELAY_MS}ms")]
    InvalidDelay {
        /// The rejected value in milliseconds.
        value_ms: u64,
    },

    /// Timeout outside 1..=3600 seconds.
    #[error("invalid {field} {value}s: must be between 1 and {MAX_TIMEOUT_SECS} seconds")]
    InvalidTimeout {
        /// Name of the timeout setting.
        field: &'static str,
        /// The rejected value in seconds.
        value: u64,
    },

    /// Scheme other than `http` or `https`.
    #[error("invalid scheme '{value}': expected http or https")]
    InvalidScheme {
        /// The rejected scheme.
        value: String,
    },

    /// Domain is empty after trimming slashes and whitespace.
    #[error("resolver domain must not be empty")]
    EmptyDomain,
}

/// Complete configuration for one checker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// File holding the `\r\n`-separated input records.
    pub input_path: PathBuf,
    /// File the result lines are appended to.
    pub output_path: PathBuf,
    /// URL scheme used for target URLs (`https` outside tests).
    pub scheme: String,
    /// Resolver domain, e.g. `dx.doi.org`.
    pub domain: String,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Delay each worker waits between requests.
    pub delay: Duration,
    /// HTTP connect timeout.
    pub connect_timeout: Duration,
    /// Total HTTP request timeout.
    pub request_timeout: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            scheme: DEFAULT_SCHEME.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            workers: DEFAULT_WORKERS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl CheckConfig {
    /// Checks every value against the supported ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&self.workers) {
            return Err(ConfigError::InvalidWorkers {
                value: self.workers,
            });
        }

        let delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
        if delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::InvalidDelay { value_ms: delay_ms });
        }

        validate_timeout("connect timeout", self.connect_timeout)?;
        validate_timeout("request timeout", self.request_timeout)?;

        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::InvalidScheme {
                value: self.scheme.clone(),
            });
        }

        if self.domain.trim().trim_matches('/').is_empty() {
            return Err(ConfigError::EmptyDomain);
        }

        Ok(())
    }

    /// Overlays values present in a config file onto this configuration.
    pub fn apply_file_config(&mut self, file: &FileConfig) {
        if let Some(input_path) = &file.input_path {
            self.input_path.clone_from(input_path);
        }
        if let Some(output_path) = &file.output_path {
            self.output_path.clone_from(output_path);
        }
        if let Some(scheme) = &file.scheme {
            self.scheme.clone_from(scheme);
        }
        if let Some(domain) = &file.domain {
            self.domain.clone_from(domain);
        }
        if let Some(workers) = file.workers {
            self.workers = workers;
        }
        if let Some(delay_ms) = file.delay_ms {
            self.delay = Duration::from_millis(delay_ms);
        }
        if let Some(secs) = file.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
    }
}

fn validate_timeout(field: &'static str, value: Duration) -> Result<(), ConfigError> {
    let secs = value.as_secs();
    if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::InvalidTimeout { field, value: secs });
    }
    Ok(())
}

/// Values read from a `key = value` config file. Absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub scheme: Option<String>,
    pub domain: Option<String>,
    pub workers: Option<usize>,
    pub delay_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/doi-checker/config.toml`
/// 2. `$HOME/.config/doi-checker/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = non_empty_env("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("doi-checker")
                .join("config.toml"),
        );
    }

    let home = non_empty_env("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("doi-checker")
            .join("config.toml"),
    )
}

fn non_empty_env(name: &str) -> Option<std::ffi::OsString> {
    env::var_os(name).filter(|value| !value.is_empty())
}

/// Loads the config file from the default location if one exists.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_default_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    load_file_config(&path).map(Some)
}

/// Loads and parses a config file.
///
/// # Errors
///
/// Fails when the file cannot be read, has invalid syntax, or names an
/// unknown key.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "input_path" => {
                cfg.input_path = Some(PathBuf::from(
                    quoted_string(value).with_context(invalid)?,
                ));
            }
            "output_path" => {
                cfg.output_path = Some(PathBuf::from(
                    quoted_string(value).with_context(invalid)?,
                ));
            }
            "scheme" => cfg.scheme = Some(quoted_string(value).with_context(invalid)?),
            "domain" => cfg.domain = Some(quoted_string(value).with_context(invalid)?),
            "workers" => {
                cfg.workers = Some(unsigned(value).with_context(invalid)?);
            }
            "delay_ms" => cfg.delay_ms = Some(unsigned(value).with_context(invalid)?),
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(unsigned(value).with_context(invalid)?);
            }
            "request_timeout_secs" => {
                cfg.request_timeout_secs = Some(unsigned(value).with_context(invalid)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    Ok(cfg)
}

/// Cuts a trailing `# comment`, ignoring `#` inside double quotes.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    let cut = line.char_indices().find_map(|(index, ch)| {
        if ch == '"' {
            quoted = !quoted;
        }
        (ch == '#' && !quoted).then_some(index)
    });
    cut.map_or(line, |index| &line[..index])
}

fn quoted_string(value: &str) -> Result<String> {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("expected a double-quoted string, got `{value}`"))
}

/// Parses a non-negative integer and narrows it to the field's type.
fn unsigned<T: TryFrom<u64>>(value: &str) -> Result<T> {
    let parsed: u64 = value
        .parse()
        .with_context(|| format!("expected a non-negative integer, got `{value}`"))?;
    T::try_from(parsed).map_err(|_| anyhow!("{parsed} is out of range"))
}
