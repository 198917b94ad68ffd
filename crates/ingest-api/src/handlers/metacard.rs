//! `GET /{id}`

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use ingest_core::constants::METACARD_MEDIA_TYPE;
use ingest_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Stream a stored metacard back as XML.
///
/// An unknown id currently renders as a server error (code `METACARD_NOT_FOUND`),
/// the same status as any other retrieval failure.
pub async fn get_metacard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let metacard = state.ingest.retrieve_metacard(&id).await?;

    tracing::debug!(
        key = %id,
        size_bytes = metacard.size,
        stored_media_type = %metacard.media_type,
        "Streaming metacard"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, METACARD_MEDIA_TYPE)
        .header(header::CONTENT_LENGTH, metacard.size)
        .body(Body::from_stream(metacard.stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string()).into()
        })
}
