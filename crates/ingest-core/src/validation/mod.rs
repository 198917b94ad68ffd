//! Validation modules

pub mod request;

pub use request::{
    parse_last_modified, require_header, require_non_blank, validate_content_size,
    ValidationError,
};
