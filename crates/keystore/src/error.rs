use keystore_codec::CodecError;
use keystore_platform::PlatformError;
use thiserror::Error;

/// Errors reported by keystore operations.
///
/// Construction never returns these: load problems are logged and the store
/// falls back to its defaults. Only [`Keystore::save`](crate::Keystore::save)
/// and friends hand them to the caller.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// The document is not present in its directory.
    #[error("file does not exist: {path}")]
    FileAbsent { path: String },

    /// The document exists but could not be read.
    #[error("error reading {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: PlatformError,
    },

    /// The document could not be decoded.
    #[error("malformed document {path}: {source}")]
    MalformedDocument {
        path: String,
        #[source]
        source: CodecError,
    },

    /// The live store could not be encoded.
    #[error("error encoding store: {0}")]
    Encode(#[source] CodecError),

    /// Writing the document failed.
    #[error("error writing to {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: PlatformError,
    },

    /// The storage is not mounted writable, so no write was attempted.
    #[error("storage is not persistent; {path} not written")]
    NotPersistent { path: String },

    /// The live store does not fit the requested typed view.
    #[error("projection error: {0}")]
    Projection(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for keystore operations.
pub type KeystoreResult<T> = Result<T, KeystoreError>;
