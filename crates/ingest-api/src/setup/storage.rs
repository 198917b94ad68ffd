//! Metacard storage setup

use anyhow::{Context, Result};
use ingest_core::Config;
use ingest_storage::{create_storage, MetacardStorage};
use std::sync::Arc;

pub fn setup_storage(config: &Config) -> Result<Arc<dyn MetacardStorage>> {
    let storage = create_storage(config).context("Failed to initialize metacard storage")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = ?config.s3_bucket(),
        "Metacard storage initialized"
    );

    Ok(storage)
}
