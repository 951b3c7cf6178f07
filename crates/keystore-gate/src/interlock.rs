use std::fmt;

use keystore_platform::{InterlockPin, Pull};

/// Mount mode the gate can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MountMode {
    ReadOnly,
    Writable,
}

impl MountMode {
    /// The `read_only` argument passed to [`StorageMount::remount`](keystore_platform::StorageMount::remount).
    pub fn read_only(self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}

impl fmt::Display for MountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("read-only"),
            Self::Writable => f.write_str("writable"),
        }
    }
}

/// Where the storage safety interlock comes from.
pub enum Interlock {
    /// No interlock wired up. The gate refuses to assume the storage is safe
    /// to write and leaves the mount alone.
    Unconfigured,
    /// The caller asserts the storage is never shared; mount writable.
    Disabled,
    /// A physical input. The operator asserts it by pulling the pin away from
    /// its idle level (e.g. grounding a pulled-up pin).
    Pin { pin: Box<dyn InterlockPin>, pull: Pull },
}

impl Interlock {
    /// A pulled-up pin that the operator grounds to allow writes.
    pub fn pin(pin: impl InterlockPin + 'static) -> Self {
        Self::pin_with_pull(pin, Pull::Up)
    }

    /// A pin with an explicit pull; asserted means the opposite level.
    pub fn pin_with_pull(pin: impl InterlockPin + 'static, pull: Pull) -> Self {
        Self::Pin {
            pin: Box::new(pin),
            pull,
        }
    }
}

impl Default for Interlock {
    fn default() -> Self {
        Self::Unconfigured
    }
}

impl fmt::Debug for Interlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("Unconfigured"),
            Self::Disabled => f.write_str("Disabled"),
            Self::Pin { pull, .. } => f.debug_struct("Pin").field("pull", pull).finish(),
        }
    }
}
