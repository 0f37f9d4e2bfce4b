//! Error types for client construction and test servers
//!
//! Per-call failures are never surfaced as `ClientError`; they are
//! normalized into [`mcpgw_core::Failure`] values at the call site.

use thiserror::Error;

/// Result type alias for client setup operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while building a client or a test server
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A base URL or endpoint path could not be turned into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL cannot carry a path
    #[error("URL cannot be used as a base: {0}")]
    NotABase(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
