//! Remote transform service client

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ingest_core::constants::ACCEPT_VERSION_HEADER;
use ingest_core::{TransformAck, TransformRequest};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{unexpected_status, ClientResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tells the transform service that new content is ready.
#[async_trait]
pub trait TransformClient: Send + Sync {
    async fn request_transform(&self, request: &TransformRequest) -> ClientResult<TransformAck>;
}

/// `TransformClient` over HTTP JSON.
#[derive(Clone, Debug)]
pub struct HttpTransformClient {
    http_client: Client,
    endpoint: Url,
    api_version: String,
}

impl HttpTransformClient {
    pub fn new(endpoint: &str, api_version: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("Invalid transform endpoint URL")?;
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for transform service")?;

        Ok(Self {
            http_client,
            endpoint,
            api_version: api_version.to_string(),
        })
    }
}

#[async_trait]
impl TransformClient for HttpTransformClient {
    async fn request_transform(&self, request: &TransformRequest) -> ClientResult<TransformAck> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(ACCEPT_VERSION_HEADER, &self.api_version)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        // Only 202 counts; a 200 means the request was not queued.
        if status != StatusCode::ACCEPTED {
            let err = unexpected_status(response).await;
            tracing::error!(
                endpoint = %self.endpoint,
                status = %status,
                location = %request.location,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Transform service rejected request"
            );
            return Err(err);
        }

        let body = response.bytes().await.unwrap_or_default();
        let ack = if body.is_empty() {
            TransformAck::default()
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Ignoring unparsable transform acknowledgement");
                TransformAck::default()
            })
        };

        tracing::info!(
            endpoint = %self.endpoint,
            location = %request.location,
            metacard_location = %request.metacard_location,
            transform_id = ?ack.id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Transform requested"
        );

        Ok(ack)
    }
}
