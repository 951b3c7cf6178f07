//! Foundation types for the interlocked keystore.
//!
//! Every other keystore crate depends on `keystore-types`.
//!
//! # Key Types
//!
//! - [`Value`]: a single configuration value (string, integer, float or boolean)
//! - [`Entries`]: an ordered key/value mapping, used for defaults, the live
//!   store and decoded documents alike

pub mod error;
pub mod value;

pub use error::TypeError;
pub use value::{Entries, Value, ValueKind};
