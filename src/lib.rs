//! DOI Checker Core Library
//!
//! This library provides the core functionality for the doi-checker tool,
//! which probes a list of DOI-style identifiers against a resolver domain
//! and records the initial status, redirect target and final status of each.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration, defaults and config-file loading
//! - [`input`] - Input loading and target URL construction
//! - [`probe`] - Two-hop HTTP resolution against the resolver
//! - [`output`] - Result line formatting and the shared append writer
//! - [`check`] - Stride-partitioned worker pool
//! - [`orchestrator`] - Wires everything together for one run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod check;
pub mod config;
pub mod input;
pub mod orchestrator;
pub mod output;
pub mod probe;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use check::{CheckEngine, CheckStats, DEFAULT_WORKERS, EngineError, stride_indices};
pub use config::{CheckConfig, ConfigError, FileConfig, load_default_file_config, load_file_config};
pub use input::{InputError, RecordError, ResolverTarget, load_records, split_records};
pub use orchestrator::{RunError, run_check};
pub use output::{ResultWriter, WriteError, escape_field, format_line, unescape_field};
pub use probe::{ProbeError, ProbeResult, REDIRECT_SENTINEL_STATUS, ResolverClient};
