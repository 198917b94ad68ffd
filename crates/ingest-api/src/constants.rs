//! HTTP boundary constants

use ingest_core::constants::MAX_CONTENT_SIZE_BYTES;

/// Multipart part carrying the primary file.
pub const FILE_PART: &str = "file";

/// Multipart part carrying the metacard.
pub const METACARD_PART: &str = "metacard";

/// Multipart text field carrying the caller's correlation id.
pub const CORRELATION_ID_FIELD: &str = "correlationId";

/// Slack for boundaries, part headers, and the correlation id field.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Largest accepted ingest request body: two maximal parts plus framing.
pub const MAX_INGEST_BODY_BYTES: u64 = 2 * MAX_CONTENT_SIZE_BYTES + MULTIPART_OVERHEAD_BYTES;
