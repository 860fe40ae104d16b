//! Shared User-Agent string for resolver probes.
//!
//! Both the probe client and the redirect-following client send the same
//! header so resolver logs attribute all traffic to one tool.

/// Tool label placed after the version in the User-Agent.
const CHECKER_UA_LABEL: &str = "doi-link-checker";

/// Default User-Agent for resolver probes.
#[must_use]
pub(crate) fn default_checker_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("doi-checker/{version} ({CHECKER_UA_LABEL})")
}
