//! Data models for the ingest gateway
//!
//! Request-scoped shapes exchanged between the HTTP boundary, the orchestrator,
//! and the remote service clients.

mod ingest;
mod metacard;
mod transform;

pub use ingest::*;
pub use metacard::*;
pub use transform::*;
