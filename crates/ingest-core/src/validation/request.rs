//! Ingest request validation
//!
//! Explicit checks run by the HTTP boundary before the orchestrator is invoked:
//! - Required headers are present and non-blank
//! - `Last-Modified` is an RFC 3339 date-time with an offset
//! - Part sizes fall within [`MIN_CONTENT_SIZE_BYTES`, `MAX_CONTENT_SIZE_BYTES`]
//! - Informational strings (file name, media type, correlation id) are non-blank

use chrono::{DateTime, FixedOffset};

use crate::constants::{MAX_CONTENT_SIZE_BYTES, MIN_CONTENT_SIZE_BYTES};

/// Structured reason an ingest request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required part '{0}'")]
    MissingPart(&'static str),

    #[error("Missing required header '{0}'")]
    MissingHeader(&'static str),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    #[error("'{0}' must not be blank")]
    Blank(&'static str),

    #[error("'{field}' size {size} is below the minimum of {min} bytes")]
    ContentTooSmall {
        field: &'static str,
        size: u64,
        min: u64,
    },

    #[error("'{field}' size {size} exceeds the maximum of {max} bytes")]
    ContentTooLarge {
        field: &'static str,
        size: u64,
        max: u64,
    },

    #[error("Malformed multipart body: {0}")]
    Multipart(String),
}

/// Check that a declared content size lies in the accepted range.
pub fn validate_content_size(field: &'static str, size: u64) -> Result<(), ValidationError> {
    if size < MIN_CONTENT_SIZE_BYTES {
        return Err(ValidationError::ContentTooSmall {
            field,
            size,
            min: MIN_CONTENT_SIZE_BYTES,
        });
    }
    if size > MAX_CONTENT_SIZE_BYTES {
        return Err(ValidationError::ContentTooLarge {
            field,
            size,
            max: MAX_CONTENT_SIZE_BYTES,
        });
    }
    Ok(())
}

/// Return the trimmed value, or `Blank` when nothing is left.
pub fn require_non_blank<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(trimmed)
}

/// A header value that must be present and non-blank.
pub fn require_header<'a>(
    name: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    let value = value.ok_or(ValidationError::MissingHeader(name))?;
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidHeader {
            name,
            reason: "value is blank".to_string(),
        });
    }
    Ok(value.trim())
}

/// ISO-8601 offset date-time without seconds, e.g. `2017-06-11T14:32Z`.
const MINUTE_PRECISION_FORMAT: &str = "%Y-%m-%dT%H:%M%#z";

/// Parse `Last-Modified` as an offset date-time.
///
/// RFC 3339 and minute-precision ISO-8601 values are accepted. Values without an
/// explicit offset (e.g. `2024-01-01T00:00:00`) are rejected.
pub fn parse_last_modified(
    name: &'static str,
    value: Option<&str>,
) -> Result<DateTime<FixedOffset>, ValidationError> {
    let value = require_header(name, value)?;
    DateTime::parse_from_rfc3339(value)
        .or_else(|e| DateTime::parse_from_str(value, MINUTE_PRECISION_FORMAT).map_err(|_| e))
        .map_err(|e| ValidationError::InvalidHeader {
            name,
            reason: format!("expected an offset date-time ({})", e),
        })
}
