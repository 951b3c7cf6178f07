use std::fmt;
use std::str::FromStr;

use keystore_types::Entries;
use serde::{Deserialize, Serialize};

use crate::error::CodecResult;
use crate::json::JsonCodec;
use crate::lines::LineCodec;

/// Serializes the live store to a self-describing document and back.
pub trait DocumentCodec {
    /// Short format name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Encode the whole mapping as one document.
    fn encode(&self, entries: &Entries) -> CodecResult<Vec<u8>>;

    /// Decode a whole document.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error (see
    /// [`CodecError::is_malformed`](crate::CodecError::is_malformed)) when
    /// `data` cannot be parsed.
    fn decode(&self, data: &[u8]) -> CodecResult<Entries>;
}

/// Selectable document format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Lines,
}

impl DocumentFormat {
    /// A codec for this format.
    pub fn codec(self) -> Box<dyn DocumentCodec> {
        match self {
            Self::Json => Box::new(JsonCodec),
            Self::Lines => Box::new(LineCodec),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Lines => f.write_str("lines"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "lines" => Ok(Self::Lines),
            other => Err(format!("unknown document format: {other}")),
        }
    }
}
