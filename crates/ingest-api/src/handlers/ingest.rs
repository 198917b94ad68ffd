//! `POST /ingest`

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use ingest_core::constants::{ACCEPT_VERSION_HEADER, MAX_CONTENT_SIZE_BYTES};
use ingest_core::validation::{parse_last_modified, require_header};
use ingest_core::{IngestRequest, ValidationError};

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::multipart::read_ingest_form;

const LAST_MODIFIED_HEADER: &str = "Last-Modified";

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<Option<&'a str>, ValidationError> {
    headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|e| ValidationError::InvalidHeader {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Accept a file and its metacard for ingest.
///
/// Headers are checked before any of the body is read; the core only runs once every
/// part is present and valid. Success is `202 Accepted` with an empty body.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let accept_version = require_header(
        ACCEPT_VERSION_HEADER,
        header_str(&headers, ACCEPT_VERSION_HEADER)?,
    )?;
    let last_modified = parse_last_modified(
        LAST_MODIFIED_HEADER,
        header_str(&headers, header::LAST_MODIFIED.as_str())?,
    )?;

    let multipart = multipart.map_err(|e| ValidationError::Multipart(e.body_text()))?;
    let form = read_ingest_form(multipart, MAX_CONTENT_SIZE_BYTES).await?;

    tracing::Span::current().record("correlation_id", form.correlation_id.as_str());
    tracing::debug!(
        accept_version = %accept_version,
        file_name = %form.file_name,
        size_bytes = form.file.size,
        metacard_bytes = form.metacard.size,
        "Ingest request decoded"
    );

    let request = IngestRequest {
        file_size: form.file.size,
        file_media_type: form.file_media_type,
        file_stream: form.file.into_stream(),
        file_name: form.file_name,
        metacard_size: form.metacard.size,
        metacard_media_type: form.metacard_media_type,
        metacard_stream: form.metacard.into_stream(),
        last_modified,
        correlation_id: form.correlation_id,
    };

    state.ingest.ingest(request).await?;

    Ok(StatusCode::ACCEPTED)
}
