use std::sync::Arc;

use object_store::aws::AmazonS3Builder;

use crate::object::ObjectMetacardStorage;
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;

/// Settings for the S3 metacard bucket.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    /// (e.g. "http://localhost:9000" for MinIO).
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Build metacard storage over an existing S3 bucket.
///
/// Credentials not given explicitly are read from the standard AWS environment.
pub fn new_s3_storage(settings: S3Settings) -> StorageResult<ObjectMetacardStorage> {
    let mut builder = AmazonS3Builder::from_env()
        .with_region(settings.region.clone())
        .with_bucket_name(settings.bucket.clone());

    if let Some(ref endpoint) = settings.endpoint_url {
        let allow_http = endpoint.starts_with("http://");
        builder = builder
            .with_endpoint(endpoint.clone())
            .with_allow_http(allow_http);
    }

    if let (Some(key_id), Some(secret)) = (
        settings.access_key_id.as_ref(),
        settings.secret_access_key.as_ref(),
    ) {
        builder = builder
            .with_access_key_id(key_id.clone())
            .with_secret_access_key(secret.clone());
    }

    let store = builder
        .build()
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    tracing::info!(
        bucket = %settings.bucket,
        region = %settings.region,
        endpoint = ?settings.endpoint_url,
        "S3 metacard storage configured"
    );

    Ok(ObjectMetacardStorage::new(
        Arc::new(store),
        StorageBackend::S3,
        settings.bucket,
    ))
}
