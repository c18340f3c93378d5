//! Tube client error types.

/// Errors from the TfL arrivals client.
#[derive(Debug, thiserror::Error)]
pub enum TubeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("TfL {status}: {message}")]
    Api { status: u16, message: String },

    /// The arrivals feed did not have the shape this adapter integrates
    /// against. Fatal: there is no sensible degraded board to show.
    #[error("unexpected arrivals feed shape: {0}")]
    UnexpectedShape(String),
}
