//! Error types for environment capabilities.

use thiserror::Error;

/// Errors reported by the storage, pin and file capabilities.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The storage is currently mounted by an external bus (e.g. USB mass
    /// storage) and cannot be remounted locally.
    #[error("storage is mounted by an external bus")]
    MountBusy,

    /// The remount request was refused.
    #[error("remount forbidden: {0}")]
    RemountForbidden(String),

    /// A write was attempted while the storage is mounted read-only.
    #[error("storage is read-only: {path}")]
    ReadOnly { path: String },

    /// The requested file or directory does not exist.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// The interlock pin could not be configured as an input.
    #[error("pin configuration failed: {0}")]
    PinConfig(String),

    /// I/O error from a host-backed capability.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for capability operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
