//! Request fixtures for ingest tests.

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use futures::{stream, StreamExt};
use ingest_core::ByteStream;

pub const FILE_CONTENT: &[u8] = b"some-content";
pub const METACARD_CONTENT: &[u8] = b"metacard-content";
pub const CORRELATION_ID: &str = "000f4e4a";
pub const LAST_MODIFIED: &str = "2017-06-11T14:32:28.120+00:00";
pub const STORED_LOCATION: &str = "http://store.example/files/42";

pub fn file_part() -> Part {
    Part::bytes(Bytes::from_static(FILE_CONTENT))
        .file_name("test.txt")
        .mime_type("text/plain")
}

pub fn metacard_part() -> Part {
    Part::bytes(Bytes::from_static(METACARD_CONTENT))
        .file_name("metacard.xml")
        .mime_type("application/xml")
}

/// A complete, valid ingest form.
pub fn ingest_form() -> MultipartForm {
    MultipartForm::new()
        .add_part("file", file_part())
        .add_part("metacard", metacard_part())
        .add_text("correlationId", CORRELATION_ID)
}

pub fn byte_stream(content: &'static [u8]) -> ByteStream {
    stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(content))]).boxed()
}
