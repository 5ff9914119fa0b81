// Error handling module
// Defines the error taxonomy surfaced by the gateway and resource APIs

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Errors returned to callers of the gateway
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure, timeout, or any other transport-level problem
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response other than 401, returned as the server sent it
    #[error("HTTP {status}: {}", truncate_body(.body))]
    Http { status: StatusCode, body: String },

    /// Terminal authorization failure
    #[error("Unauthorized: {}", truncate_body(.body))]
    Unauthorized { body: String },

    /// The credential refresh call failed; the session has been cleared
    #[error("Token refresh failed: {0}")]
    RefreshFailed(#[source] Box<ApiError>),

    /// Session storage could not be read or written
    #[error("Session storage error: {0}")]
    Session(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Input rejected before it was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Transport(e) => e.status(),
            ApiError::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// True when the session ended: a terminal 401 or a failed refresh
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::RefreshFailed(_)
        )
    }

    /// Build the error for a non-success response
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { body }
        } else {
            ApiError::Http { status, body }
        }
    }
}

/// Truncate a response body to avoid logging excessive data
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

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
