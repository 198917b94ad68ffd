//! Test helpers: build the router against mockito services and in-memory storage.
//!
//! Run from workspace root: `cargo test -p ingest-api`.

pub mod fixtures;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use ingest_api::setup::{routes, services};
use ingest_api::state::AppState;
use ingest_api::IngestService;
use ingest_core::{
    BaseConfig, Config, IngestServiceConfig, StorageBackend, TransformAck, TransformRequest,
};
use ingest_services::{ClientResult, HttpStoreClient, TransformClient};
use ingest_storage::{MetacardStorage, ObjectMetacardStorage};

pub const RETRIEVE_BASE: &str = "http://localhost:8080/";
pub const TRANSFORM_API_VERSION: &str = "1.0.0";

/// Test application: server plus the metacard storage behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn MetacardStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(mock_url: &str) -> Config {
    Config(Box::new(IngestServiceConfig {
        base: BaseConfig {
            server_port: 8080,
            environment: "test".to_string(),
        },
        store_endpoint_url: format!("{}/store", mock_url),
        transform_endpoint_url: format!("{}/transform", mock_url),
        transform_api_version: TRANSFORM_API_VERSION.to_string(),
        retrieve_endpoint_url: RETRIEVE_BASE.to_string(),
        storage_backend: StorageBackend::Memory,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_access_key_id: None,
        aws_secret_access_key: None,
    }))
}

fn serve(state: Arc<AppState>, storage: Arc<dyn MetacardStorage>) -> TestApp {
    let app = routes::setup_routes(state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");
    TestApp { server, storage }
}

/// Wire the app the way the binary does, with both remote services on `mock_url`.
pub fn setup_test_app(mock_url: &str) -> TestApp {
    setup_test_app_with_config(&test_config(mock_url))
}

pub fn setup_test_app_with_config(config: &Config) -> TestApp {
    let storage: Arc<dyn MetacardStorage> = Arc::new(ObjectMetacardStorage::in_memory());
    let state = services::initialize_services(config, storage.clone())
        .expect("Failed to initialize services");
    serve(state, storage)
}

/// Transform client that records every request and accepts it.
#[derive(Default)]
pub struct RecordingTransform {
    pub requests: Mutex<Vec<TransformRequest>>,
}

#[async_trait]
impl TransformClient for RecordingTransform {
    async fn request_transform(&self, request: &TransformRequest) -> ClientResult<TransformAck> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(TransformAck::default())
    }
}

/// Real store client on `mock_url`, recording transform client.
pub fn setup_recording_app(mock_url: &str) -> (TestApp, Arc<RecordingTransform>) {
    let storage: Arc<dyn MetacardStorage> = Arc::new(ObjectMetacardStorage::in_memory());
    let transform = Arc::new(RecordingTransform::default());
    let store_client = HttpStoreClient::new(&format!("{}/store", mock_url))
        .expect("Failed to create store client");

    let ingest = IngestService::new(
        Arc::new(store_client),
        storage.clone(),
        transform.clone(),
        RETRIEVE_BASE.to_string(),
    );
    let app = serve(Arc::new(AppState::new(ingest, false)), storage);
    (app, transform)
}
