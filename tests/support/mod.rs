//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use std::path::{Path, PathBuf};
use std::time::Duration;

use doi_checker_core::CheckConfig;
use wiremock::MockServer;

/// Writes records joined by `\r\n` to `input.csv` in `dir`.
pub fn write_input(dir: &Path, records: &[&str]) -> PathBuf {
    let path = dir.join("input.csv");
    std::fs::write(&path, records.join("\r\n")).expect("write input file");
    path
}

/// Builds a record whose identifier field is `identifier`.
pub fn record(identifier: &str) -> String {
    format!("1;Some title;Some author;2021;{identifier};journal")
}

/// Config pointing at a mock server over plain HTTP with no delay.
pub fn mock_config(server: &MockServer, dir: &Path, workers: usize) -> CheckConfig {
    CheckConfig {
        input_path: dir.join("input.csv"),
        output_path: dir.join("output.csv"),
        scheme: "http".to_string(),
        domain: server.address().to_string(),
        workers,
        delay: Duration::ZERO,
        connect_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(5),
    }
}

/// Reads the output file into lines; a missing file reads as no lines.
pub fn output_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
