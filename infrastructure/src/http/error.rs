//! Error types for the HTTP adapter

use consult_application::GatewayError;
use thiserror::Error;

/// Result type alias for HTTP adapter operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// Errors that can occur when talking to the consultation backend
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx reply; `detail` is the body's `detail` or `HTTP <code> <reason>`
    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<HttpError> for GatewayError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Transport(e) if e.is_timeout() => GatewayError::Timeout,
            HttpError::Transport(e) => GatewayError::ConnectionError(e.to_string()),
            HttpError::Status { status, detail } => match status {
                401 | 403 => GatewayError::Unauthorized(detail),
                404 => GatewayError::NotFound(detail),
                _ => GatewayError::Status { status, detail },
            },
            HttpError::ParseError { error, .. } => GatewayError::InvalidResponse(error),
            HttpError::UnexpectedResponse(msg) => GatewayError::InvalidResponse(msg),
            HttpError::ClientBuild(msg) | HttpError::InvalidBaseUrl(msg) => {
                GatewayError::Other(msg)
            }
        }
    }
}
