//! Result output.
//!
//! Formatting lives in [`format`]; [`ResultWriter`] serialises appends from
//! all workers through one lock onto one long-lived file handle.
//!
//! Output is append-only. Running the checker twice over the same input
//! appends a second set of lines; nothing is deduplicated.

mod error;
pub mod format;
mod writer;

pub use error::WriteError;
pub use format::{OUTPUT_DELIMITER, escape_field, format_line, unescape_field};
pub use writer::ResultWriter;
