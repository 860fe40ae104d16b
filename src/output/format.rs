//! Output line formatting.
//!
//! Lines are `<url>;<initial>;<redirect>;<final>\n`. A field containing the
//! delimiter is wrapped as `"` + value + `"""`. That is not RFC 4180 quoting;
//! existing consumers of the output depend on this exact form.

use crate::probe::ProbeResult;

/// Output field delimiter.
pub const OUTPUT_DELIMITER: char = ';';

const ESCAPE_PREFIX: &str = "\"";
const ESCAPE_SUFFIX: &str = "\"\"\"";

/// Wraps a field containing the delimiter; other fields pass through.
#[must_use]
pub fn escape_field(value: &str) -> String {
    if value.contains(OUTPUT_DELIMITER) {
        format!("{ESCAPE_PREFIX}{value}{ESCAPE_SUFFIX}")
    } else {
        value.to_string()
    }
}

/// Reverses [`escape_field`].
///
/// Only tokens that contain the delimiter and carry both the prefix and the
/// suffix are unwrapped; anything else is returned unchanged.
#[must_use]
pub fn unescape_field(token: &str) -> &str {
    token
        .strip_prefix(ESCAPE_PREFIX)
        .and_then(|rest| rest.strip_suffix(ESCAPE_SUFFIX))
        .filter(|inner| inner.contains(OUTPUT_DELIMITER))
        .unwrap_or(token)
}

/// Formats one probe result as a newline-terminated output line.
#[must_use]
pub fn format_line(result: &ProbeResult) -> String {
    format!(
        "{url}{d}{initial}{d}{redirect}{d}{final_status}\n",
        url = escape_field(&result.url),
        initial = result.initial_status,
        redirect = escape_field(&result.redirect_url),
        final_status = result.final_status,
        d = OUTPUT_DELIMITER,
    )
}
