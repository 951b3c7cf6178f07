use keystore_types::{Entries, Value};

use crate::error::{CodecError, CodecResult};
use crate::format::DocumentCodec;

/// JSON object codec.
///
/// ```text
/// {"brightness":9,"name":"lamp","enabled":true}
/// ```
///
/// Nested arrays or objects are rejected as malformed. JSON has no form for
/// NaN or infinity, so encoding a non-finite float is an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, entries: &Entries) -> CodecResult<Vec<u8>> {
        if let Some((key, value)) = entries
            .iter()
            .find(|(_, v)| matches!(v, Value::Float(f) if !f.is_finite()))
        {
            return Err(CodecError::Encode(format!(
                "{key}: {value} has no JSON representation"
            )));
        }
        serde_json::to_vec(entries).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> CodecResult<Entries> {
        serde_json::from_slice(data).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}
