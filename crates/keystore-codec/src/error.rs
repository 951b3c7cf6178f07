/// Errors from encoding or decoding a persisted document.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The document could not be parsed.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The mapping could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

impl CodecError {
    /// `true` for every decode-side failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
