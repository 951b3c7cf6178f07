use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Ordered key/value mapping.
///
/// Used for the declared defaults, the live store and decoded documents. A
/// `BTreeMap` keeps encoded documents and diagnostic dumps deterministic.
pub type Entries = BTreeMap<String, Value>;

/// A single configuration value.
///
/// Serialized untagged, so a JSON document reads as a plain object of
/// scalars: `{"brightness": 5, "name": "lamp", "enabled": true}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// The type of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Str => "string",
        };
        f.write_str(name)
    }
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// Borrow the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The numeric payload as a float. Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Parse `raw` as a value of the given kind.
    ///
    /// Booleans accept `true`/`false` in any ASCII case, which also covers
    /// documents written by tools that capitalize them.
    pub fn parse_as(kind: ValueKind, raw: &str) -> Result<Self, TypeError> {
        let mismatch = || TypeError::Mismatch {
            expected: kind,
            raw: raw.to_string(),
        };
        match kind {
            ValueKind::Str => Ok(Self::Str(raw.to_string())),
            ValueKind::Int => raw.trim().parse().map(Self::Int).map_err(|_| mismatch()),
            ValueKind::Float => raw.trim().parse().map(Self::Float).map_err(|_| mismatch()),
            ValueKind::Bool => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Self::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Self::Bool(false))
                } else {
                    Err(mismatch())
                }
            }
        }
    }

    /// Parse `raw` as a value of the same kind as `self`.
    pub fn coerce_like(&self, raw: &str) -> Result<Self, TypeError> {
        Self::parse_as(self.kind(), raw)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}
