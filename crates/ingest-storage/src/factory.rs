use std::sync::Arc;

use ingest_core::Config;

use crate::s3::{new_s3_storage, S3Settings};
use crate::{MetacardStorage, ObjectMetacardStorage, StorageBackend, StorageError, StorageResult};

/// Create the metacard storage backend selected by configuration
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn MetacardStorage>> {
    match config.storage_backend() {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = new_s3_storage(S3Settings {
                bucket,
                region,
                endpoint_url: config.s3_endpoint().map(String::from),
                access_key_id: config.aws_access_key_id().map(String::from),
                secret_access_key: config.aws_secret_access_key().map(String::from),
            })?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Memory => {
            tracing::warn!("Using in-memory metacard storage; metacards are lost on restart");
            Ok(Arc::new(ObjectMetacardStorage::in_memory()))
        }
    }
}
