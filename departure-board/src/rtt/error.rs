//! RTT client error types.

/// Errors from the RealTimeTrains HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum RttError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check rtt.username and rtt.password")]
    Unauthorized,

    /// API returned an error status
    #[error("RTT {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The request was rejected before being sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
