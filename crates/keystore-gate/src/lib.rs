//! Storage mount gate for the interlocked keystore.
//!
//! Before the keystore touches a single file, the gate decides whether the
//! storage root is remounted writable or read-only. The decision rests on a
//! physical interlock so that storage is never opened writable while a host
//! computer may also have it mounted over USB.
//!
//! | [`Interlock`]       | Remount        | Persistent            |
//! |---------------------|----------------|-----------------------|
//! | `Unconfigured`      | none           | no                    |
//! | `Disabled`          | writable       | if the remount works  |
//! | `Pin`, asserted     | writable       | if the remount works  |
//! | `Pin`, idle         | read-only      | no                    |
//!
//! A refused remount never propagates: it is recorded in the
//! [`MountOutcome`] and the store carries on in memory.
//!
//! # Quick Start
//!
//! ```rust
//! use keystore_gate::{Interlock, MountGate, MountMode, MountOutcome};
//! use keystore_platform::{MemoryDevice, MockPin};
//!
//! let device = MemoryDevice::new();
//! let mut mount = device.mount();
//! let outcome = MountGate::new(false).resolve(Interlock::pin(MockPin::grounded()), &mut mount);
//! assert!(matches!(outcome, MountOutcome::Mounted(MountMode::Writable)));
//! assert!(outcome.is_persistent());
//! ```

pub mod error;
pub mod gate;
pub mod interlock;

pub use error::GateError;
pub use gate::{MountGate, MountOutcome, OPT_OUT_HINT};
pub use interlock::{Interlock, MountMode};
