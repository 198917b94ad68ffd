//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use ingest_core::{Config, StorageBackend};

/// Validate configuration, failing on anything that would break every request.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    // The key is appended verbatim, so a base without a trailing slash glues the key
    // onto the last path segment.
    if !config.retrieve_endpoint_url().ends_with('/') {
        tracing::warn!(
            retrieve_endpoint = %config.retrieve_endpoint_url(),
            "RETRIEVE_ENDPOINT_URL does not end with '/'; metacard locations will not match GET /{{id}}"
        );
    }

    if config.is_production() && config.storage_backend() == StorageBackend::Memory {
        return Err(anyhow::anyhow!(
            "STORAGE_BACKEND=memory is not allowed in production; metacards would be lost on restart"
        ));
    }

    Ok(())
}
