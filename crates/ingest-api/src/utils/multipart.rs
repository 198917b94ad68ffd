//! Multipart decoding for ingest requests
//!
//! Parts are spooled to anonymous temporary files while their bytes are counted, so
//! the orchestrator gets an exact size and a stream it can read once, without the
//! whole payload in memory. The temporary files vanish when their handles drop.

use std::io::SeekFrom;

use axum::extract::multipart::{Field, Multipart};
use futures::StreamExt;
use ingest_core::constants::METACARD_MEDIA_TYPE;
use ingest_core::validation::require_non_blank;
use ingest_core::{AppError, ByteStream, ValidationError};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;

use crate::constants::{CORRELATION_ID_FIELD, FILE_PART, METACARD_PART};

/// One binary part, fully received and rewound.
#[derive(Debug)]
pub struct SpooledPart {
    pub size: u64,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    file: File,
}

impl SpooledPart {
    pub fn into_stream(self) -> ByteStream {
        ReaderStream::new(self.file).boxed()
    }
}

/// The decoded body of `POST /ingest`.
#[derive(Debug)]
pub struct IngestForm {
    pub file: SpooledPart,
    pub file_name: String,
    pub file_media_type: String,
    pub metacard: SpooledPart,
    pub metacard_media_type: String,
    pub correlation_id: String,
}

fn multipart_error(err: impl std::fmt::Display) -> AppError {
    ValidationError::Multipart(err.to_string()).into()
}

fn duplicate_part(part: &str) -> AppError {
    multipart_error(format!("part '{}' was sent more than once", part))
}

fn spool_error(err: std::io::Error) -> AppError {
    AppError::Internal(format!("Failed to spool multipart part: {}", err))
}

async fn spool_field(
    mut field: Field<'_>,
    part: &'static str,
    max_bytes: u64,
) -> Result<SpooledPart, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let mut file = File::from_std(tempfile::tempfile().map_err(spool_error)?);
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
        if size > max_bytes {
            return Err(ValidationError::ContentTooLarge {
                field: part,
                size,
                max: max_bytes,
            }
            .into());
        }
        file.write_all(&chunk).await.map_err(spool_error)?;
    }

    file.flush().await.map_err(spool_error)?;
    file.seek(SeekFrom::Start(0)).await.map_err(spool_error)?;

    tracing::debug!(part = part, size_bytes = size, "Multipart part spooled");

    Ok(SpooledPart {
        size,
        file_name,
        content_type,
        file,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read the `file`, `metacard`, and `correlationId` parts. Unknown parts are skipped.
///
/// Spooling stops as soon as a binary part grows past `max_part_bytes`.
pub async fn read_ingest_form(
    mut multipart: Multipart,
    max_part_bytes: u64,
) -> Result<IngestForm, AppError> {
    let mut file: Option<SpooledPart> = None;
    let mut metacard: Option<SpooledPart> = None;
    let mut correlation_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        match name.as_str() {
            FILE_PART => {
                if file.is_some() {
                    return Err(duplicate_part(FILE_PART));
                }
                file = Some(spool_field(field, FILE_PART, max_part_bytes).await?);
            }
            METACARD_PART => {
                if metacard.is_some() {
                    return Err(duplicate_part(METACARD_PART));
                }
                metacard = Some(spool_field(field, METACARD_PART, max_part_bytes).await?);
            }
            CORRELATION_ID_FIELD => {
                correlation_id = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::debug!(part = other, "Ignoring unexpected multipart part");
            }
        }
    }

    let file = file.ok_or(ValidationError::MissingPart(FILE_PART))?;
    let metacard = metacard.ok_or(ValidationError::MissingPart(METACARD_PART))?;
    let correlation_id = correlation_id.ok_or(ValidationError::MissingPart(CORRELATION_ID_FIELD))?;
    let correlation_id = require_non_blank(CORRELATION_ID_FIELD, &correlation_id)?.to_string();

    let file_name = non_blank(file.file_name.clone()).ok_or(ValidationError::Blank("file name"))?;
    let file_media_type =
        non_blank(file.content_type.clone()).ok_or(ValidationError::Blank("file content type"))?;
    let metacard_media_type = non_blank(metacard.content_type.clone())
        .unwrap_or_else(|| METACARD_MEDIA_TYPE.to_string());

    Ok(IngestForm {
        file,
        file_name,
        file_media_type,
        metacard,
        metacard_media_type,
        correlation_id,
    })
}
