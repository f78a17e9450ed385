//! Transport-side error types.

use thiserror::Error;

/// Errors raised while exchanging documents with the gateway.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP round trip failed (connect, timeout, or non-success status).
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An empty document was handed to one of the raw-XML entry points.
    #[error("refusing to send an empty request document")]
    EmptyRequest,
}
