//! Document codecs for the interlocked keystore.
//!
//! The persisted document is a single file holding a flat mapping of keys to
//! scalar values. It is rewritten in full on every save, never patched.
//!
//! # Formats
//!
//! - [`JsonCodec`] -- one JSON object, values keep their types
//! - [`LineCodec`] -- one `key=value` line per entry, values read back as
//!   strings
//!
//! Any decode failure surfaces as [`CodecError::Malformed`].

pub mod error;
pub mod format;
pub mod json;
pub mod lines;

pub use error::{CodecError, CodecResult};
pub use format::{DocumentCodec, DocumentFormat};
pub use json::JsonCodec;
pub use lines::LineCodec;
