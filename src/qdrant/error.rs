use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QdrantError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out after {0:?}")]
    TimeoutError(Duration),

    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("Qdrant error: {0}")]
    ApiError(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl QdrantError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            QdrantError::TimeoutError(timeout)
        } else if err.is_decode() {
            QdrantError::UnexpectedResponse(err.to_string())
        } else {
            QdrantError::ConnectionError(err.to_string())
        }
    }
}
