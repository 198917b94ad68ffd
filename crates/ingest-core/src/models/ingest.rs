use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use futures::Stream;

/// A single-pass stream of content bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Everything the orchestrator needs for one ingest call.
///
/// Both streams are consumed at most once; dropping the request releases them.
pub struct IngestRequest {
    pub file_size: u64,
    pub file_media_type: String,
    pub file_stream: ByteStream,
    /// Informational only, never used as a storage key.
    pub file_name: String,
    pub metacard_size: u64,
    pub metacard_media_type: String,
    pub metacard_stream: ByteStream,
    pub last_modified: DateTime<FixedOffset>,
    pub correlation_id: String,
}

impl fmt::Debug for IngestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestRequest")
            .field("file_size", &self.file_size)
            .field("file_media_type", &self.file_media_type)
            .field("file_name", &self.file_name)
            .field("metacard_size", &self.metacard_size)
            .field("metacard_media_type", &self.metacard_media_type)
            .field("last_modified", &self.last_modified)
            .field("correlation_id", &self.correlation_id)
            .finish_non_exhaustive()
    }
}
