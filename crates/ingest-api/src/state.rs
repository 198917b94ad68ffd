//! Application state shared by all handlers.

use crate::services::IngestService;

#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestService,
    /// Error bodies carry `details` and `error_type` (never in production).
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(ingest: IngestService, is_production: bool) -> Self {
        Self {
            ingest,
            expose_error_details: !is_production,
        }
    }
}
