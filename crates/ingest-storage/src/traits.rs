//! Metacard storage abstraction
//!
//! This module defines the MetacardStorage trait that every blob backend implements.

use std::fmt;

use async_trait::async_trait;
use ingest_core::ByteStream;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// The source stream could not be read to the end.
    #[error("Failed to read metacard stream: {0}")]
    ReadFailed(String),

    /// Bytes written differ from the declared size. The written object is left in place.
    #[error("Metacard '{key}' declared {declared} bytes but {actual} were written")]
    SizeMismatch { key: String, declared: u64, actual: u64 },

    #[error("Metacard not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored metacard opened for reading.
///
/// The stream borrows nothing from the adaptor; dropping it before the end is
/// how a caller closes it early.
pub struct MetacardRetrieveResponse {
    /// Media type recorded at store time.
    pub media_type: String,
    pub size: u64,
    pub stream: ByteStream,
}

impl fmt::Debug for MetacardRetrieveResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetacardRetrieveResponse")
            .field("media_type", &self.media_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Metacard storage abstraction trait
///
/// The orchestrator and the retrieve handler only see this trait, so backends can be
/// swapped (S3 in production, in-memory for development and tests).
#[async_trait]
pub trait MetacardStorage: Send + Sync {
    /// Write `stream` under `key`, tagged with `media_type`.
    ///
    /// Fails with `SizeMismatch` when the number of bytes written differs from
    /// `size`, and with `ReadFailed` when the stream yields an error.
    async fn store(
        &self,
        size: u64,
        media_type: &str,
        stream: ByteStream,
        key: &str,
    ) -> StorageResult<()>;

    /// Open the metacard stored under `key`. Fails with `NotFound` if there is none.
    async fn retrieve(&self, key: &str) -> StorageResult<MetacardRetrieveResponse>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
