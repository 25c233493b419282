//! Error types for the memochat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Parsing, stripping, and sanitizing are total functions and have no
//! variants here; only the turn boundary and the provider can fail.

use thiserror::Error;

/// The top-level error type for memochat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A turn was attempted before connection parameters were established.
    #[error("Session not configured: connect with an API key, base URL and model first")]
    SessionNotConfigured,

    /// The completion provider call failed; no state was changed.
    #[error("Completion request failed: {0}")]
    CompletionRequestFailed(#[source] ProviderError),
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        Error::CompletionRequestFailed(err)
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}
