//! Application-wide constants.

/// Smallest accepted file or metacard size in bytes.
pub const MIN_CONTENT_SIZE_BYTES: u64 = 1;

/// Largest accepted file or metacard size in bytes (10 GiB).
pub const MAX_CONTENT_SIZE_BYTES: u64 = 10 * 1024 * 1024 * 1024;

/// Media type served for every retrieved metacard.
pub const METACARD_MEDIA_TYPE: &str = "application/xml";

/// Header carrying the API version, both inbound and towards the transform service.
pub const ACCEPT_VERSION_HEADER: &str = "Accept-Version";
