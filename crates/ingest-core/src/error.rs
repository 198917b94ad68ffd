//! Error types module
//!
//! This module provides the error taxonomy of the ingest gateway. Every failure the
//! orchestrator can report is one `AppError` variant; the HTTP boundary is the only
//! place that turns a variant into a status code, using the `ErrorMetadata` trait.

use crate::validation::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing request input, detected before any I/O.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The remote store service rejected or failed to receive the file.
    #[error("Store error: {0}")]
    Store(String),

    /// The blob store failed to write or read a metacard.
    #[error("Store metacard error: {0}")]
    StoreMetacard(String),

    /// No metacard is filed under the requested key.
    #[error("Metacard not found: {0}")]
    MetacardNotFound(String),

    /// The retrieve URL for a stored metacard could not be built.
    #[error("Metacard location error: {0}")]
    MetacardLocation(String),

    /// The transform service rejected or failed to receive the notification.
    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Validation(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parts and headers and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Store(_) => (
            500,
            "STORE_ERROR",
            true,
            Some("Retry the ingest request after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::StoreMetacard(_) => (
            500,
            "STORE_METACARD_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        // Retrieval does not yet report a distinct not-found status.
        AppError::MetacardNotFound(_) => (
            500,
            "METACARD_NOT_FOUND",
            false,
            Some("Verify the metacard ID exists"),
            false,
            LogLevel::Warn,
        ),
        AppError::MetacardLocation(_) => (
            500,
            "METACARD_LOCATION_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Transform(_) => (
            500,
            "TRANSFORM_ERROR",
            true,
            Some("Retry the ingest request after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::Store(_) => "Store",
            AppError::StoreMetacard(_) => "StoreMetacard",
            AppError::MetacardNotFound(_) => "MetacardNotFound",
            AppError::MetacardLocation(_) => "MetacardLocation",
            AppError::Transform(_) => "Transform",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error message including source chain
    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InternalWithSource { message, source } => {
                format!("{}: {:#}", message, source)
            }
            other => other.to_string(),
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::Store(_) => "Failed to store file".to_string(),
            AppError::StoreMetacard(_) => "Failed to store metacard".to_string(),
            AppError::MetacardNotFound(_) => "Unable to retrieve metacard".to_string(),
            AppError::MetacardLocation(_) => "Unable to construct retrieve URI".to_string(),
            AppError::Transform(_) => "Failed to request transform".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
