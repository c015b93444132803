//! Error types for the conference API client.

use thiserror::Error;

/// Result type for conference API operations.
pub type Result<T> = std::result::Result<T, ConferenceApiError>;

/// Conference API client errors.
#[derive(Debug, Error)]
pub enum ConferenceApiError {
    /// Configuration error (missing base URL, unusable URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not complete within the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ConferenceApiError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConferenceApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ConferenceApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConferenceApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ConferenceApiError::Parse(err.to_string())
        } else {
            ConferenceApiError::Network(err.to_string())
        }
    }
}
