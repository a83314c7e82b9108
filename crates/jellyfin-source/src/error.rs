//! Error types for the Jellyfin catalog source.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias using [`SourceError`]
pub type Result<T> = std::result::Result<T, SourceError>;

/// Outcome of a failed automatic login.
///
/// Cloneable so every request waiting on the same login attempt can receive it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// The login request never produced a response
    #[error("authentication request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server rejected credentials with status {0}")]
    Rejected(u16),

    /// The server answered, but the body was not a login response
    #[error("malformed login response: {0}")]
    Malformed(String),
}

/// Main error type for catalog operations
#[derive(Error, Debug)]
pub enum SourceError {
    /// No session could be established for an authenticated request
    #[error("login failed: {0}")]
    Login(#[from] LoginError),

    /// Network-level failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server returned a non-success status
    #[error("request to {url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// A catalog locator that cannot be routed
    #[error("invalid catalog locator: {0}")]
    InvalidLocator(String),
}
