//! Error types for resolver probes.
//!
//! Only the first request of a probe can fail: a failed redirect follow-up is
//! recorded as [`REDIRECT_SENTINEL_STATUS`](super::REDIRECT_SENTINEL_STATUS)
//! instead of surfacing here.

use thiserror::Error;

/// Errors that cause a record to be skipped.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The built URL is not a valid absolute URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error probing {url}: {source}")]
    Network {
        /// The URL that was being probed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before a response arrived.
    #[error("timeout probing {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl ProbeError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Maps a request failure to [`ProbeError::Timeout`] or
    /// [`ProbeError::Network`].
    pub fn from_request(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a client construction error.
    #[must_use]
    pub fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }
}
