//! Ingest Core Library
//!
//! This crate provides the domain models, error types, configuration, and input
//! validation shared by the ingest gateway crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ByteStream, IngestRequest, StoredMetacardKey, TransformAck, TransformRequest};
pub use storage_types::StorageBackend;
pub use validation::ValidationError;
