/// Outcome of probing one target URL.
///
/// Lives only long enough to be formatted into an output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The URL that was requested.
    pub url: String,
    /// Status of the first, non-following request.
    pub initial_status: u16,
    /// `Location` of a 301/302 response; empty otherwise.
    pub redirect_url: String,
    /// Status after following the redirect, or the initial status when there
    /// was nothing to follow.
    pub final_status: u16,
}

impl ProbeResult {
    /// Returns `true` when the first response was a followed redirect.
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        super::is_followed_redirect(self.initial_status)
    }
}
