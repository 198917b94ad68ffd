//! Ingest orchestration
//!
//! Runs one ingest as a forward-only pipeline: store the file remotely, file the
//! metacard in the blob store, then ask the transform service to process both.
//! The first failing step ends the call; earlier side effects are not undone.

use std::sync::Arc;
use std::time::Instant;

use ingest_core::validation::validate_content_size;
use ingest_core::{AppError, IngestRequest, StoredMetacardKey, TransformRequest};
use ingest_services::{StoreClient, TransformClient};
use ingest_storage::{MetacardRetrieveResponse, MetacardStorage, StorageError};
use url::Url;

/// Map a blob store failure to the error kind reported to callers.
pub fn metacard_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(key) => AppError::MetacardNotFound(key),
        other => AppError::StoreMetacard(other.to_string()),
    }
}

#[derive(Clone)]
pub struct IngestService {
    store_client: Arc<dyn StoreClient>,
    metacard_storage: Arc<dyn MetacardStorage>,
    transform_client: Arc<dyn TransformClient>,
    /// Prefix the metacard key is appended to, verbatim.
    retrieve_endpoint: String,
}

impl IngestService {
    pub fn new(
        store_client: Arc<dyn StoreClient>,
        metacard_storage: Arc<dyn MetacardStorage>,
        transform_client: Arc<dyn TransformClient>,
        retrieve_endpoint: String,
    ) -> Self {
        Self {
            store_client,
            metacard_storage,
            transform_client,
            retrieve_endpoint,
        }
    }

    fn metacard_location(&self, key: &StoredMetacardKey) -> Result<Url, AppError> {
        let raw = format!("{}{}", self.retrieve_endpoint, key);
        Url::parse(&raw).map_err(|e| {
            tracing::error!(error = %e, location = %raw, "Invalid metacard retrieve location");
            AppError::MetacardLocation(format!("Unable to construct retrieve URI '{}': {}", raw, e))
        })
    }

    /// Store the file, store the metacard, then request a transform.
    ///
    /// Both streams in `request` are released on every path: consumed by the step
    /// that uses them, or dropped when an earlier step fails.
    pub async fn ingest(&self, request: IngestRequest) -> Result<(), AppError> {
        validate_content_size("file", request.file_size)?;
        validate_content_size("metacard", request.metacard_size)?;

        let IngestRequest {
            file_size,
            file_media_type,
            file_stream,
            file_name,
            metacard_size,
            metacard_media_type,
            metacard_stream,
            last_modified,
            correlation_id,
        } = request;
        let start = Instant::now();

        tracing::debug!(
            correlation_id = %correlation_id,
            file_name = %file_name,
            size_bytes = file_size,
            metacard_bytes = metacard_size,
            last_modified = %last_modified,
            "Starting ingest"
        );

        let location = self
            .store_client
            .store(file_size, &file_media_type, file_stream, &file_name)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let key = StoredMetacardKey::generate();
        self.metacard_storage
            .store(
                metacard_size,
                &metacard_media_type,
                metacard_stream,
                key.as_str(),
            )
            .await
            .map_err(metacard_error)?;

        let metacard_location = self.metacard_location(&key)?;

        let transform_request = TransformRequest {
            location: location.to_string(),
            mime_type: file_media_type,
            metacard_location: metacard_location.to_string(),
        };
        let ack = self
            .transform_client
            .request_transform(&transform_request)
            .await
            .map_err(|e| AppError::Transform(e.to_string()))?;

        tracing::info!(
            correlation_id = %correlation_id,
            file_name = %file_name,
            key = %key,
            location = %transform_request.location,
            transform_id = ?ack.id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Ingest accepted"
        );

        Ok(())
    }

    pub async fn retrieve_metacard(&self, key: &str) -> Result<MetacardRetrieveResponse, AppError> {
        self.metacard_storage
            .retrieve(key)
            .await
            .map_err(metacard_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::DateTime;
    use futures::{stream, StreamExt};
    use ingest_core::{ByteStream, TransformAck};
    use ingest_services::{ClientError, ClientResult};
    use ingest_storage::{ObjectMetacardStorage, StorageBackend, StorageResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const STORED_LOCATION: &str = "http://store.example/files/42";
    const RETRIEVE_BASE: &str = "http://ingest.example/";

    async fn read_all(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.expect("chunk"));
        }
        out
    }

    fn byte_stream(content: &'static [u8]) -> ByteStream {
        stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(content))]).boxed()
    }

    #[derive(Default)]
    struct FakeStore {
        fail: bool,
        calls: AtomicUsize,
        received: Mutex<Vec<u8>>,
    }

    #[async_trait]
    impl StoreClient for FakeStore {
        async fn store(
            &self,
            _size: u64,
            _media_type: &str,
            stream: ByteStream,
            _file_name: &str,
        ) -> ClientResult<Url> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let bytes = read_all(stream).await;
            *self.received.lock().unwrap() = bytes;
            if self.fail {
                return Err(ClientError::MissingLocation);
            }
            Ok(Url::parse(STORED_LOCATION).unwrap())
        }
    }

    #[derive(Default)]
    struct FakeTransform {
        fail: bool,
        requests: Mutex<Vec<TransformRequest>>,
    }

    impl FakeTransform {
        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TransformClient for FakeTransform {
        async fn request_transform(
            &self,
            request: &TransformRequest,
        ) -> ClientResult<TransformAck> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ClientError::InvalidRequest("rejected".to_string()));
            }
            Ok(TransformAck::default())
        }
    }

    struct CountingStorage {
        inner: ObjectMetacardStorage,
        stores: AtomicUsize,
    }

    #[async_trait]
    impl MetacardStorage for CountingStorage {
        async fn store(
            &self,
            size: u64,
            media_type: &str,
            stream: ByteStream,
            key: &str,
        ) -> StorageResult<()> {
            self.stores.fetch_add(1, Ordering::SeqCst);
            self.inner.store(size, media_type, stream, key).await
        }

        async fn retrieve(&self, key: &str) -> StorageResult<MetacardRetrieveResponse> {
            self.inner.retrieve(key).await
        }

        fn backend_type(&self) -> StorageBackend {
            self.inner.backend_type()
        }
    }

    struct Harness {
        store: Arc<FakeStore>,
        storage: Arc<CountingStorage>,
        transform: Arc<FakeTransform>,
        service: IngestService,
    }

    fn harness(store: FakeStore, transform: FakeTransform, retrieve_base: &str) -> Harness {
        let store = Arc::new(store);
        let storage = Arc::new(CountingStorage {
            inner: ObjectMetacardStorage::in_memory(),
            stores: AtomicUsize::new(0),
        });
        let transform = Arc::new(transform);
        let service = IngestService::new(
            store.clone(),
            storage.clone(),
            transform.clone(),
            retrieve_base.to_string(),
        );
        Harness {
            store,
            storage,
            transform,
            service,
        }
    }

    fn request(file: &'static [u8], metacard: &'static [u8]) -> IngestRequest {
        IngestRequest {
            file_size: file.len() as u64,
            file_media_type: "text/plain".to_string(),
            file_stream: byte_stream(file),
            file_name: "test.txt".to_string(),
            metacard_size: metacard.len() as u64,
            metacard_media_type: "application/xml".to_string(),
            metacard_stream: byte_stream(metacard),
            last_modified: DateTime::parse_from_rfc3339("2017-06-11T14:32:28.120+00:00").unwrap(),
            correlation_id: "000f4e4a".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ingest_success_links_file_and_metacard() {
        let h = harness(FakeStore::default(), FakeTransform::default(), RETRIEVE_BASE);

        h.service
            .ingest(request(b"some-content", b"metacard-content"))
            .await
            .expect("ingest succeeds");

        assert_eq!(*h.store.received.lock().unwrap(), b"some-content");
        let requests = h.transform.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].location, STORED_LOCATION);
        assert_eq!(requests[0].mime_type, "text/plain");

        let key = requests[0]
            .metacard_location
            .strip_prefix(RETRIEVE_BASE)
            .expect("metacard location starts with retrieve base");
        assert_eq!(key.len(), 32);

        let metacard = h.service.retrieve_metacard(key).await.expect("retrieve");
        assert_eq!(metacard.media_type, "application/xml");
        assert_eq!(read_all(metacard.stream).await, b"metacard-content");
    }

    #[tokio::test]
    async fn test_out_of_range_size_fails_before_any_call() {
        let h = harness(FakeStore::default(), FakeTransform::default(), RETRIEVE_BASE);
        let mut req = request(b"some-content", b"metacard-content");
        req.file_size = 0;

        let err = h.service.ingest(req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut req = request(b"some-content", b"metacard-content");
        req.metacard_size = ingest_core::constants::MAX_CONTENT_SIZE_BYTES + 1;
        let err = h.service.ingest(req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(h.store.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.storage.stores.load(Ordering::SeqCst), 0);
        assert_eq!(h.transform.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_stops_pipeline() {
        let h = harness(
            FakeStore {
                fail: true,
                ..Default::default()
            },
            FakeTransform::default(),
            RETRIEVE_BASE,
        );

        let err = h
            .service
            .ingest(request(b"some-content", b"metacard-content"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store(_)));
        assert_eq!(h.store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.storage.stores.load(Ordering::SeqCst), 0);
        assert_eq!(h.transform.calls(), 0);
    }

    #[tokio::test]
    async fn test_metacard_failure_skips_transform_but_keeps_file() {
        let h = harness(FakeStore::default(), FakeTransform::default(), RETRIEVE_BASE);
        let mut req = request(b"some-content", b"metacard-content");
        req.metacard_size = 99;

        let err = h.service.ingest(req).await.unwrap_err();

        assert!(matches!(err, AppError::StoreMetacard(_)));
        assert_eq!(h.store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*h.store.received.lock().unwrap(), b"some-content");
        assert_eq!(h.transform.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_retrieve_base_is_location_error() {
        let h = harness(
            FakeStore::default(),
            FakeTransform::default(),
            "not a base url ",
        );

        let err = h
            .service
            .ingest(request(b"some-content", b"metacard-content"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MetacardLocation(_)));
        assert_eq!(h.storage.stores.load(Ordering::SeqCst), 1);
        assert_eq!(h.transform.calls(), 0);
    }

    #[tokio::test]
    async fn test_transform_failure_is_reported() {
        let h = harness(
            FakeStore::default(),
            FakeTransform {
                fail: true,
                ..Default::default()
            },
            RETRIEVE_BASE,
        );

        let err = h
            .service
            .ingest(request(b"some-content", b"metacard-content"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Transform(_)));
        assert_eq!(h.transform.calls(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_unknown_key_is_not_found() {
        let h = harness(FakeStore::default(), FakeTransform::default(), RETRIEVE_BASE);
        let err = h.service.retrieve_metacard("nonexistent-key").await.unwrap_err();
        assert!(matches!(err, AppError::MetacardNotFound(ref key) if key == "nonexistent-key"));
    }

    #[test]
    fn test_storage_errors_map_to_metacard_kinds() {
        assert!(matches!(
            metacard_error(StorageError::SizeMismatch {
                key: "k".to_string(),
                declared: 2,
                actual: 1
            }),
            AppError::StoreMetacard(_)
        ));
        assert!(matches!(
            metacard_error(StorageError::ReadFailed("eof".to_string())),
            AppError::StoreMetacard(_)
        ));
        assert!(matches!(
            metacard_error(StorageError::NotFound("k".to_string())),
            AppError::MetacardNotFound(_)
        ));
    }
}
