//! Target URL construction from input records.

use super::error::RecordError;

/// Record field separator.
pub const FIELD_SEPARATOR: char = ';';

/// Zero-based index of the field holding the identifier path.
pub const IDENTIFIER_FIELD_INDEX: usize = 4;

/// Scheme and resolver domain that identifiers are appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverTarget {
    scheme: String,
    domain: String,
}

impl ResolverTarget {
    /// Creates a target. Surrounding whitespace and slashes on the domain are
    /// dropped, so `dx.doi.org/` and `dx.doi.org` build the same URLs.
    #[must_use]
    pub fn new(scheme: impl Into<String>, domain: &str) -> Self {
        Self {
            scheme: scheme.into(),
            domain: domain.trim().trim_matches('/').to_string(),
        }
    }

    /// Returns the normalised domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Builds `<scheme>://<domain>/<field4>` from a record.
    ///
    /// The identifier is appended verbatim, without percent-encoding.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] when the record has fewer than
    /// five `;`-separated fields.
    pub fn build_url(&self, record: &str) -> Result<String, RecordError> {
        let identifier = identifier_field(record)?;
        Ok(format!("{}://{}/{identifier}", self.scheme, self.domain))
    }
}

/// Extracts the identifier field from a record.
///
/// # Errors
///
/// Returns [`RecordError::MissingField`] when the field does not exist.
pub fn identifier_field(record: &str) -> Result<&str, RecordError> {
    record
        .split(FIELD_SEPARATOR)
        .nth(IDENTIFIER_FIELD_INDEX)
        .ok_or_else(|| {
            RecordError::missing_field(
                record.split(FIELD_SEPARATOR).count(),
                IDENTIFIER_FIELD_INDEX,
            )
        })
}
