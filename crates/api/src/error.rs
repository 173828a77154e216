use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unable to read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Request timeout after {attempts} attempts")]
    Timeout { attempts: usize },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimitExceeded { .. } => true,
            ApiError::ServerError { status, .. } if *status >= 500 => true,
            ApiError::Timeout { .. } => true,
            ApiError::RequestFailed(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }

    /// Failures that prove the server never acted on the request, so even a
    /// non-idempotent request can be sent again.
    pub fn is_safe_to_replay(&self) -> bool {
        match self {
            ApiError::RateLimitExceeded { .. } => true,
            ApiError::RequestFailed(err) => err.is_connect(),
            _ => false,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::AuthenticationFailed { .. } => {
                Some("Check the API key passed with --apiKey or stored in the config file")
            }
            ApiError::RateLimitExceeded { .. } => Some("Wait a moment and run the command again"),
            ApiError::NotFound { .. } => Some("Check that the alert id, alias or tinyId is correct"),
            ApiError::BadRequest { .. } => Some("Review the flags passed to the command"),
            ApiError::Timeout { .. } => Some("Check your network connection or try again later"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
