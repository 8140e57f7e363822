//! Error types for halosync-client.

use thiserror::Error;

/// Failures below the HTTP status line: DNS, TLS, connection, timeouts.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Raised by test transports with nothing scripted for a request.
    #[error("no response registered for {method} {url}")]
    NoResponse { method: String, url: String },
}
