//! Ingest API Library
//!
//! This crate provides the ingest orchestrator, the HTTP handlers around it, and the
//! application setup used by the `ingest-api` binary and the integration tests.

pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::IngestService;
