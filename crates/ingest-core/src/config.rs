//! Configuration module
//!
//! This module provides the configuration of the ingest gateway: server settings,
//! remote service endpoints, and metacard storage settings. A `Config` is built once
//! at startup and handed to the setup functions; nothing reads the environment later.

use std::env;

use url::Url;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8080;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
}

/// Ingest gateway configuration
#[derive(Clone, Debug)]
pub struct IngestServiceConfig {
    pub base: BaseConfig,
    // Remote services
    pub store_endpoint_url: String,
    pub transform_endpoint_url: String,
    pub transform_api_version: String,
    /// Base URL that the metacard key is appended to when building its retrieve location.
    pub retrieve_endpoint_url: String,
    // Metacard storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
}

/// Application configuration (ingest gateway).
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestServiceConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_ingest().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn store_endpoint_url(&self) -> &str {
        &self.as_ingest().store_endpoint_url
    }

    pub fn transform_endpoint_url(&self) -> &str {
        &self.as_ingest().transform_endpoint_url
    }

    pub fn transform_api_version(&self) -> &str {
        &self.as_ingest().transform_api_version
    }

    pub fn retrieve_endpoint_url(&self) -> &str {
        &self.as_ingest().retrieve_endpoint_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.as_ingest().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.as_ingest().aws_secret_access_key.as_deref()
    }
}

fn required_var(name: &str) -> Result<String, anyhow::Error> {
    env::var(name).map_err(|_| anyhow::anyhow!("{} must be set", name))
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn validate_endpoint(name: &str, value: &str) -> Result<(), anyhow::Error> {
    let url = Url::parse(value)
        .map_err(|e| anyhow::anyhow!("{} must be an absolute URL: {}", name, e))?;
    if url.cannot_be_a_base() {
        return Err(anyhow::anyhow!("{} must be a hierarchical URL", name));
    }
    Ok(())
}

impl IngestServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?;

        let storage_backend = match optional_var("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        Ok(Self {
            base: BaseConfig {
                server_port,
                environment,
            },
            store_endpoint_url: required_var("STORE_ENDPOINT_URL")?,
            transform_endpoint_url: required_var("TRANSFORM_ENDPOINT_URL")?,
            transform_api_version: required_var("TRANSFORM_API_VERSION")?,
            retrieve_endpoint_url: required_var("RETRIEVE_ENDPOINT_URL")?,
            storage_backend,
            s3_bucket: optional_var("S3_BUCKET"),
            s3_region: optional_var("S3_REGION").or_else(|| optional_var("AWS_REGION")),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            aws_access_key_id: optional_var("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_var("AWS_SECRET_ACCESS_KEY"),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        validate_endpoint("STORE_ENDPOINT_URL", &self.store_endpoint_url)?;
        validate_endpoint("TRANSFORM_ENDPOINT_URL", &self.transform_endpoint_url)?;
        validate_endpoint("RETRIEVE_ENDPOINT_URL", &self.retrieve_endpoint_url)?;

        if self.transform_api_version.trim().is_empty() {
            return Err(anyhow::anyhow!("TRANSFORM_API_VERSION must not be blank"));
        }

        // Validate storage backend configuration
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }
}
