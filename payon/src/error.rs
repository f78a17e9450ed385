//! Error types for the gateway codec.

/// Errors produced while decoding a gateway response document.
///
/// Decoding failures never escape as panics; callers receive this typed
/// failure and the higher-level success predicates treat a malformed
/// response as "not successful".
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The response text is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
