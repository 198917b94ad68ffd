use reqwest::StatusCode;
use thiserror::Error;

/// Remote service call errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Response is missing the Location header")]
    MissingLocation,

    #[error("Invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for remote service calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Build an `UnexpectedStatus` error, keeping whatever body the service sent.
pub(crate) async fn unexpected_status(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ClientError::UnexpectedStatus { status, body }
}
