//! Ingest Storage Library
//!
//! This crate provides the metacard blob adaptor: the `MetacardStorage` trait and
//! its `object_store` implementation, backed by S3 or an in-memory store.
//!
//! # Metacard keys
//!
//! Keys are opaque. The adaptor only rejects blank keys and keys the backend cannot
//! address (empty segments, `.` or `..`); it never derives structure from them.

pub mod factory;
pub mod object;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use ingest_core::StorageBackend;
pub use object::ObjectMetacardStorage;
pub use traits::{MetacardRetrieveResponse, MetacardStorage, StorageError, StorageResult};
