//! Error types for directory reads
//!
//! Covers HTTP failures, missing records and unreadable fixture data.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 300;

/// Errors that can occur when reading directory data
///
/// `Clone` so that a single failed load can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The request could not be completed
    #[error("HTTP request failed: {0}")]
    Transport(Arc<reqwest::Error>),

    /// The response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Fixture data could not be read or parsed
    #[error("Fixture data unavailable: {0}")]
    Fixture(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            DirectoryError::InvalidResponse(error.to_string())
        } else {
            DirectoryError::Transport(Arc::new(error))
        }
    }
}

/// Error body shape used by the backend: `{"error": ...}` or `{"message": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl DirectoryError {
    /// Truncate a response body to avoid carrying excessive data in messages
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Builds an error from a non-success response
    ///
    /// # Arguments
    /// * `status` - HTTP status code of the response
    /// * `body` - Raw response body, used for the message
    /// * `resource` - Request path, reported when the body carries no message
    pub fn from_status(status: reqwest::StatusCode, body: &str, resource: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error.or(parsed.message))
            .unwrap_or_else(|| Self::truncate_body(body));

        match status.as_u16() {
            404 => DirectoryError::NotFound(if message.is_empty() {
                resource.to_string()
            } else {
                message
            }),
            code => DirectoryError::Status {
                status: code,
                message,
            },
        }
    }

    /// Whether this error means the record does not exist, as opposed to a failed request
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}
