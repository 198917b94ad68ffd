use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use ingest_core::ByteStream;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, GetOptions, ObjectStore, WriteMultipart};

use crate::traits::{MetacardRetrieveResponse, MetacardStorage, StorageError, StorageResult};
use crate::StorageBackend;

/// Upload parts allowed in flight before the writer waits.
const MAX_IN_FLIGHT_PARTS: usize = 4;

/// Media type reported for objects stored without a content type attribute.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Metacard storage over any `object_store` backend
#[derive(Clone)]
pub struct ObjectMetacardStorage {
    store: Arc<dyn ObjectStore>,
    backend: StorageBackend,
    /// Bucket name (or a label for non-bucket backends), for logs only.
    bucket: String,
}

impl ObjectMetacardStorage {
    pub fn new(store: Arc<dyn ObjectStore>, backend: StorageBackend, bucket: String) -> Self {
        Self {
            store,
            backend,
            bucket,
        }
    }

    /// Process-local storage; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemory::new()),
            StorageBackend::Memory,
            "memory".to_string(),
        )
    }

    fn object_path(key: &str) -> StorageResult<Path> {
        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey("key must not be blank".to_string()));
        }
        Path::parse(key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }

    async fn abort_upload(&self, writer: WriteMultipart, key: &str) {
        // Abort failures are logged only so they never hide the error being reported.
        if let Err(e) = writer.abort().await {
            tracing::warn!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "Failed to abort metacard upload"
            );
        }
    }
}

#[async_trait]
impl MetacardStorage for ObjectMetacardStorage {
    async fn store(
        &self,
        size: u64,
        media_type: &str,
        mut stream: ByteStream,
        key: &str,
    ) -> StorageResult<()> {
        let location = Self::object_path(key)?;
        let start = Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, media_type.to_string().into());

        let upload = self
            .store
            .put_multipart_opts(&location, attributes.into())
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to start metacard upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let mut writer = WriteMultipart::new(upload);
        let mut written: u64 = 0;

        while let Some(next) = stream.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        size_bytes = written,
                        "Metacard stream read failed"
                    );
                    self.abort_upload(writer, key).await;
                    return Err(StorageError::ReadFailed(e.to_string()));
                }
            };

            if let Err(e) = writer.wait_for_capacity(MAX_IN_FLIGHT_PARTS).await {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = written,
                    "Metacard part upload failed"
                );
                self.abort_upload(writer, key).await;
                return Err(StorageError::UploadFailed(e.to_string()));
            }

            writer.write(&chunk);
            written += chunk.len() as u64;
        }

        writer.finish().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = written,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Metacard upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        if written != size {
            tracing::error!(
                bucket = %self.bucket,
                key = %key,
                declared_bytes = size,
                size_bytes = written,
                "Metacard size mismatch"
            );
            return Err(StorageError::SizeMismatch {
                key: key.to_string(),
                declared: size,
                actual: written,
            });
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            media_type = %media_type,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Metacard stored"
        );

        Ok(())
    }

    async fn retrieve(&self, key: &str) -> StorageResult<MetacardRetrieveResponse> {
        let location = Self::object_path(key)?;
        let start = Instant::now();

        let result = self
            .store
            .get_opts(&location, GetOptions::default())
            .await
            .map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
                other => {
                    tracing::error!(
                        error = %other,
                        bucket = %self.bucket,
                        key = %key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Metacard download failed"
                    );
                    StorageError::DownloadFailed(other.to_string())
                }
            })?;

        let media_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string())
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());
        let size = result.meta.size as u64;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            "Metacard opened"
        );

        let stream = result.into_stream().map_err(std::io::Error::other).boxed();

        Ok(MetacardRetrieveResponse {
            media_type,
            size,
            stream,
        })
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> ByteStream {
        stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c))),
        )
        .boxed()
    }

    async fn read_all(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.expect("chunk"));
        }
        out
    }

    #[tokio::test]
    async fn test_store_then_retrieve_round_trip() {
        let storage = ObjectMetacardStorage::in_memory();
        let content: &'static [u8] = b"<metacard>content</metacard>";

        storage
            .store(
                content.len() as u64,
                "application/xml",
                byte_stream(vec![&content[..10], &content[10..]]),
                "1234",
            )
            .await
            .expect("store");

        let response = storage.retrieve("1234").await.expect("retrieve");
        assert_eq!(response.media_type, "application/xml");
        assert_eq!(response.size, content.len() as u64);
        assert_eq!(read_all(response.stream).await, content);
    }

    #[tokio::test]
    async fn test_media_type_recorded_at_store_time() {
        let storage = ObjectMetacardStorage::in_memory();
        storage
            .store(4, "text/xml", byte_stream(vec![b"<a/>"]), "k")
            .await
            .expect("store");

        let response = storage.retrieve("k").await.expect("retrieve");
        assert_eq!(response.media_type, "text/xml");
    }

    #[tokio::test]
    async fn test_size_mismatch_fails_at_store() {
        let storage = ObjectMetacardStorage::in_memory();
        let err = storage
            .store(100, "application/xml", byte_stream(vec![b"short"]), "k")
            .await
            .unwrap_err();

        match err {
            StorageError::SizeMismatch {
                key,
                declared,
                actual,
            } => {
                assert_eq!(key, "k");
                assert_eq!(declared, 100);
                assert_eq!(actual, 5);
            }
            other => panic!("Expected SizeMismatch, got {:?}", other),
        }

        // No compensation: the written object stays in place.
        let response = storage.retrieve("k").await.expect("object left in place");
        assert_eq!(read_all(response.stream).await, b"short");
    }

    #[tokio::test]
    async fn test_retrieve_missing_key_is_not_found() {
        let storage = ObjectMetacardStorage::in_memory();
        let err = storage.retrieve("nonexistent-key").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref key) if key == "nonexistent-key"));
    }

    #[tokio::test]
    async fn test_stream_read_error_is_reported() {
        let storage = ObjectMetacardStorage::in_memory();
        let failing: ByteStream = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            )),
        ])
        .boxed();

        let err = storage
            .store(20, "application/xml", failing, "k")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ReadFailed(ref msg) if msg.contains("client went away")));
        assert!(matches!(
            storage.retrieve("k").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_key_rejected() {
        let storage = ObjectMetacardStorage::in_memory();
        let err = storage
            .store(1, "application/xml", byte_stream(vec![b"x"]), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(matches!(
            storage.retrieve("").await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_dropping_stream_early_is_silent() {
        let storage = ObjectMetacardStorage::in_memory();
        storage
            .store(3, "application/xml", byte_stream(vec![b"abc"]), "k")
            .await
            .expect("store");
        let response = storage.retrieve("k").await.expect("retrieve");
        drop(response);
    }
}
