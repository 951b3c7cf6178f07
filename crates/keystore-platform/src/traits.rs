//! Capability traits the keystore is built against.
//!
//! None of these are required to be `Send` or `Sync`: a keystore is owned by
//! a single control thread and every call blocks until the device answers.

use crate::error::Result;

/// Remount capability for the backing storage.
pub trait StorageMount {
    /// Remount the storage root read-only (`true`) or writable (`false`).
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MountBusy`](crate::PlatformError::MountBusy)
    /// when an external bus owns the storage, or another
    /// [`PlatformError`](crate::PlatformError) when the remount is refused.
    fn remount(&mut self, read_only: bool) -> Result<()>;
}

/// Internal pull resistor applied to an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Pull {
    /// Pulled high; the pin reads high while unconnected.
    #[default]
    Up,
    /// Pulled low; the pin reads low while unconnected.
    Down,
}

impl Pull {
    /// Logic level the pin reads while nothing drives it.
    pub fn idle_level(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// A debounced digital input used as the storage safety interlock.
pub trait InterlockPin {
    /// Configure the pin as an input with the given pull.
    fn configure_input(&mut self, pull: Pull) -> Result<()>;

    /// Read the debounced logic level. `true` is high.
    fn is_high(&self) -> bool;
}

/// Whole-file primitives on the storage root.
///
/// Paths are `/`-separated device paths such as `/.config`.
pub trait FileSystem {
    /// Names of the entries directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NotFound` if `dir` does not exist.
    fn list_dir(&self, dir: &str) -> Result<Vec<String>>;

    /// Read a whole file.
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Replace a file's contents, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ReadOnly` if storage is mounted read-only.
    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()>;
}
