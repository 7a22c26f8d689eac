//! Error types for assistant backends.

use thiserror::Error;

/// Errors a [`TextGenerator`](crate::TextGenerator) can return.
///
/// These never reach the user; [`Assistant`](crate::Assistant) turns them
/// into fallback text.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key in the configured environment variable.
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    /// Transport failure, including timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response had no text candidate.
    #[error("empty response from model")]
    EmptyResponse,

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Convenience type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
