//! Line-oriented `key=value` codec.
//!
//! # Format
//!
//! ```text
//! brightness=9
//! greeting=hello\nworld
//! url=http://host/?a=b
//! odd\=key=1
//! ```
//!
//! - one entry per line, split at the first unescaped `=`
//! - `\\`, `\n` and `\r` are escaped in keys and values; `=` is escaped in
//!   keys only, since everything after the separator belongs to the value
//! - blank lines are ignored
//! - a line without a separator is a key with an empty value
//! - an unknown escape is kept verbatim; a known one (`\\`, `\n`, `\r`,
//!   `\=`) is always decoded, even in files written before escaping existed
//!
//! Values are written with their display form and read back as strings.

use keystore_types::{Entries, Value};
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::format::DocumentCodec;

const SEPARATOR: char = '=';
const ESCAPE: char = '\\';

/// `key=value` line codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineCodec;

impl DocumentCodec for LineCodec {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn encode(&self, entries: &Entries) -> CodecResult<Vec<u8>> {
        let mut out = String::new();
        for (key, value) in entries {
            escape_into(&mut out, key, true);
            out.push(SEPARATOR);
            escape_into(&mut out, &value.to_string(), false);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }

    fn decode(&self, data: &[u8]) -> CodecResult<Entries> {
        let text = std::str::from_utf8(data)
            .map_err(|e| CodecError::Malformed(format!("not UTF-8: {e}")))?;

        let mut entries = Entries::new();
        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.is_empty() {
                continue;
            }
            let (key, value) = match find_separator(line) {
                Some(at) => (unescape(&line[..at]), unescape(&line[at + 1..])),
                None => {
                    debug!(line = idx + 1, "no separator; reading as empty value");
                    (unescape(line), String::new())
                }
            };
            if entries.insert(key, Value::Str(value)).is_some() {
                debug!(line = idx + 1, "duplicate key; later value wins");
            }
        }
        Ok(entries)
    }
}

fn escape_into(out: &mut String, s: &str, is_key: bool) {
    for ch in s.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            SEPARATOR if is_key => out.push_str("\\="),
            _ => out.push(ch),
        }
    }
}

/// Byte offset of the first `=` not preceded by an escape.
fn find_separator(line: &str) -> Option<usize> {
    let mut chars = line.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            ESCAPE => {
                chars.next();
            }
            SEPARATOR => return Some(i),
            _ => {}
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(ESCAPE) => out.push(ESCAPE),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(SEPARATOR) => out.push(SEPARATOR),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }
    out
}
