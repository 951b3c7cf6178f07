use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced by value conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("cannot read {raw:?} as {expected}")]
    Mismatch { expected: ValueKind, raw: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}
