//! Ingest Services Layer
//!
//! Clients for the two remote collaborators of the gateway: the store service that
//! persists the primary file, and the transform service that is told about new
//! content. Both are traits so the orchestrator can run against fakes.

pub mod error;
pub mod store_client;
pub mod transform_client;

pub use error::{ClientError, ClientResult};
pub use store_client::{HttpStoreClient, StoreClient};
pub use transform_client::{HttpTransformClient, TransformClient};
