//! Client error types

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Everything a `BlogifyClient` call can fail with
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure; the request may not have reached the server
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx answer, carrying the server's `{message, error}` body
    #[error("{message}: {error}")]
    Api {
        status: u16,
        message: String,
        error: String,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Token storage error: {0}")]
    TokenStorage(#[from] std::io::Error),

    #[error("No configuration directory available for the token file")]
    NoConfigDir,
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show the end user
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { error, .. } => error.clone(),
            other => other.to_string(),
        }
    }
}
