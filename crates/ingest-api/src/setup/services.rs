//! Remote clients and orchestrator wiring

use anyhow::Result;
use ingest_core::Config;
use ingest_services::{HttpStoreClient, HttpTransformClient};
use ingest_storage::MetacardStorage;
use std::sync::Arc;

use crate::services::IngestService;
use crate::state::AppState;

/// Build the remote clients and the orchestrator around `storage`.
pub fn initialize_services(
    config: &Config,
    storage: Arc<dyn MetacardStorage>,
) -> Result<Arc<AppState>> {
    let store_client = HttpStoreClient::new(config.store_endpoint_url())?;
    let transform_client = HttpTransformClient::new(
        config.transform_endpoint_url(),
        config.transform_api_version(),
    )?;

    tracing::info!(
        store_endpoint = %config.store_endpoint_url(),
        transform_endpoint = %config.transform_endpoint_url(),
        transform_api_version = %config.transform_api_version(),
        retrieve_endpoint = %config.retrieve_endpoint_url(),
        "Remote service clients initialized"
    );

    let ingest = IngestService::new(
        Arc::new(store_client),
        storage,
        Arc::new(transform_client),
        config.retrieve_endpoint_url().to_string(),
    );

    Ok(Arc::new(AppState::new(ingest, config.is_production())))
}
