//! HTTP error types

use thiserror::Error;

/// HTTP errors that can occur while marshalling or sending requests
#[derive(Debug, Error)]
pub enum HttpError {
    /// HTTP error with status code
    #[error("HTTP error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Invalid request URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if err.is_connect() {
            HttpError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            HttpError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() || err.is_body() {
            HttpError::Serialization(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for HttpError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

impl From<cc_json::Error> for HttpError {
    fn from(err: cc_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}
