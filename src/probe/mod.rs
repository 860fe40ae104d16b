//! Two-hop resolution of target URLs against the resolver.
//!
//! # Protocol
//!
//! 1. GET the target URL without following redirects.
//! 2. On 301 or 302, read `Location` and GET it once with redirects enabled.
//! 3. Record `{url, initial status, redirect URL, final status}`.
//!
//! Redirect follow-up failures never fail the probe; they are recorded as
//! [`REDIRECT_SENTINEL_STATUS`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use doi_checker_core::probe::ResolverClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResolverClient::new(Duration::from_secs(10), Duration::from_secs(30))?;
//! let result = client.probe("https://dx.doi.org/10.1000/182").await?;
//! println!("{} -> {}", result.initial_status, result.final_status);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod result;

pub use client::ResolverClient;
pub use error::ProbeError;
pub use result::ProbeResult;

/// Final status recorded when a redirect could not be followed.
pub const REDIRECT_SENTINEL_STATUS: u16 = 500;

/// Returns `true` for the statuses whose `Location` is followed (301, 302).
#[must_use]
pub fn is_followed_redirect(status: u16) -> bool {
    matches!(status, 301 | 302)
}
