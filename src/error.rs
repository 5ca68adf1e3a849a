//! Error handling for the screener
//!
//! Defines the error taxonomy surfaced to users and establishes a unified
//! Result type using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for screening operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenerError {
    /// Invalid user input; reported before any network call
    #[error("validation error: {0}")]
    Validation(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    /// Upstream answered HTTP 429
    #[error("quote service overloaded (HTTP 429), try again later")]
    RateLimited,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScreenerError {
    /// True for errors caused by user input rather than the quote service
    pub fn is_validation(&self) -> bool {
        matches!(self, ScreenerError::Validation(_))
    }
}

/// Result type alias for screening operations
pub type Result<T> = anyhow::Result<T>;

/// Find the `ScreenerError` inside an anyhow chain, if any
pub fn classify(err: &anyhow::Error) -> Option<&ScreenerError> {
    err.chain().find_map(|e| e.downcast_ref::<ScreenerError>())
}
