//! Remote store service client
//!
//! Sends the primary file to the store service as a streamed multipart upload and
//! returns the location the service reports for it.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ingest_core::ByteStream;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Body, Client};
use url::Url;

use crate::error::{unexpected_status, ClientError, ClientResult};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Persists the primary file somewhere else and says where.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Upload `stream` (exactly `size` bytes) and return its location.
    async fn store(
        &self,
        size: u64,
        media_type: &str,
        stream: ByteStream,
        file_name: &str,
    ) -> ClientResult<Url>;
}

/// `StoreClient` over HTTP multipart.
#[derive(Clone, Debug)]
pub struct HttpStoreClient {
    http_client: Client,
    endpoint: Url,
}

impl HttpStoreClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("Invalid store endpoint URL")?;
        // No overall timeout: uploads may be several GiB.
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for store service")?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    fn resolve_location(&self, response: &reqwest::Response) -> ClientResult<Url> {
        let raw = response
            .headers()
            .get(header::LOCATION)
            .ok_or(ClientError::MissingLocation)?;
        let location = raw.to_str().map_err(|e| ClientError::InvalidLocation {
            location: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
            reason: e.to_string(),
        })?;

        self.endpoint
            .join(location)
            .map_err(|e| ClientError::InvalidLocation {
                location: location.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    async fn store(
        &self,
        size: u64,
        media_type: &str,
        stream: ByteStream,
        file_name: &str,
    ) -> ClientResult<Url> {
        let start = Instant::now();

        let part = Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(file_name.to_string())
            .mime_str(media_type)
            .map_err(|e| ClientError::InvalidRequest(format!("media type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = unexpected_status(response).await;
            tracing::error!(
                endpoint = %self.endpoint,
                file_name = %file_name,
                status = %status,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Store service rejected file"
            );
            return Err(err);
        }

        let location = self.resolve_location(&response)?;

        tracing::info!(
            endpoint = %self.endpoint,
            file_name = %file_name,
            location = %location,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File stored"
        );

        Ok(location)
    }
}
