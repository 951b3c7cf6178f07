//! In-memory device for tests and simulation.
//!
//! A [`MemoryDevice`] models a small flash filesystem that boots read-only,
//! can be claimed by an external bus, and only accepts writes after a
//! successful writable remount. Handles returned by [`MemoryDevice::mount`]
//! and [`MemoryDevice::filesystem`] share the same state, so a test can keep
//! the device and inspect what a keystore did to it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::traits::{FileSystem, InterlockPin, Pull, StorageMount};

#[derive(Debug, Default)]
struct DeviceState {
    files: BTreeMap<String, Vec<u8>>,
    writable: bool,
    bus_claimed: bool,
    fail_writes: bool,
    remounts: Vec<bool>,
    write_attempts: usize,
}

/// Shared in-memory storage device.
#[derive(Clone, Debug, Default)]
pub struct MemoryDevice {
    state: Arc<RwLock<DeviceState>>,
}

impl MemoryDevice {
    /// A fresh, empty device mounted read-only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file on the device without going through the mount checks.
    pub fn with_file(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.state
            .write()
            .expect("lock poisoned")
            .files
            .insert(normalize(path), data.into());
        self
    }

    /// Simulate a host computer holding the storage over USB: every remount
    /// is refused with [`PlatformError::MountBusy`].
    pub fn claimed_by_bus(self) -> Self {
        self.state.write().expect("lock poisoned").bus_claimed = true;
        self
    }

    /// Make every subsequent write fail with an I/O error, even when mounted
    /// writable.
    pub fn failing_writes(self) -> Self {
        self.state.write().expect("lock poisoned").fail_writes = true;
        self
    }

    /// A remount handle on this device.
    pub fn mount(&self) -> MemoryMount {
        MemoryMount {
            device: self.clone(),
        }
    }

    /// A filesystem handle on this device.
    pub fn filesystem(&self) -> MemoryFileSystem {
        MemoryFileSystem {
            device: self.clone(),
        }
    }

    /// Current contents of a file, if present.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .expect("lock poisoned")
            .files
            .get(&normalize(path))
            .cloned()
    }

    /// Whether the device is currently mounted writable.
    pub fn is_writable(&self) -> bool {
        self.state.read().expect("lock poisoned").writable
    }

    /// `read_only` arguments of every remount request, in order, including
    /// refused ones.
    pub fn remounts(&self) -> Vec<bool> {
        self.state.read().expect("lock poisoned").remounts.clone()
    }

    /// Number of write attempts, successful or not.
    pub fn write_attempts(&self) -> usize {
        self.state.read().expect("lock poisoned").write_attempts
    }
}

/// Remount handle on a [`MemoryDevice`].
#[derive(Clone, Debug)]
pub struct MemoryMount {
    device: MemoryDevice,
}

impl StorageMount for MemoryMount {
    fn remount(&mut self, read_only: bool) -> Result<()> {
        let mut state = self.device.state.write().expect("lock poisoned");
        state.remounts.push(read_only);
        if state.bus_claimed {
            return Err(PlatformError::MountBusy);
        }
        state.writable = !read_only;
        debug!(read_only, "memory device remounted");
        Ok(())
    }
}

/// Filesystem handle on a [`MemoryDevice`].
#[derive(Clone, Debug)]
pub struct MemoryFileSystem {
    device: MemoryDevice,
}

impl FileSystem for MemoryFileSystem {
    fn list_dir(&self, dir: &str) -> Result<Vec<String>> {
        let dir = normalize(dir);
        let prefix = if dir == "/" {
            dir.clone()
        } else {
            format!("{dir}/")
        };

        let state = self.device.state.read().expect("lock poisoned");
        let mut names: Vec<String> = state
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect();
        names.dedup();

        if names.is_empty() && dir != "/" {
            return Err(PlatformError::NotFound { path: dir });
        }
        Ok(names)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize(path);
        let state = self.device.state.read().expect("lock poisoned");
        state
            .files
            .get(&path)
            .cloned()
            .ok_or(PlatformError::NotFound { path })
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let path = normalize(path);
        let mut state = self.device.state.write().expect("lock poisoned");
        state.write_attempts += 1;
        if !state.writable {
            return Err(PlatformError::ReadOnly { path });
        }
        if state.fail_writes {
            return Err(PlatformError::Io(std::io::Error::other(
                "simulated flash write failure",
            )));
        }
        state.files.insert(path, data.to_vec());
        Ok(())
    }
}

/// A simulated interlock input.
///
/// The pin is either grounded by the operator (reads low whatever the pull)
/// or left floating (reads the pull's idle level). Reads are counted through
/// a shared counter so a test can check how often the pin was sampled after
/// handing it away.
#[derive(Debug)]
pub struct MockPin {
    grounded: bool,
    pull: Option<Pull>,
    reject_config: bool,
    reads: Arc<AtomicUsize>,
}

impl MockPin {
    /// A pin tied to ground.
    pub fn grounded() -> Self {
        Self {
            grounded: true,
            pull: None,
            reject_config: false,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A pin with nothing connected.
    pub fn floating() -> Self {
        Self {
            grounded: false,
            ..Self::grounded()
        }
    }

    /// Make `configure_input` fail.
    pub fn rejecting_config(mut self) -> Self {
        self.reject_config = true;
        self
    }

    /// Shared counter of `is_high` calls.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }

    /// The pull most recently configured, if any.
    pub fn pull(&self) -> Option<Pull> {
        self.pull
    }
}

impl InterlockPin for MockPin {
    fn configure_input(&mut self, pull: Pull) -> Result<()> {
        if self.reject_config {
            return Err(PlatformError::PinConfig("pin already claimed".into()));
        }
        self.pull = Some(pull);
        Ok(())
    }

    fn is_high(&self) -> bool {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.grounded {
            return false;
        }
        self.pull.is_some_and(Pull::idle_level)
    }
}

/// Canonical device path: leading `/`, no empty or trailing components.
fn normalize(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Mount behaviour
    // -----------------------------------------------------------------------

    #[test]
    fn boots_read_only() {
        let device = MemoryDevice::new();
        let mut fs = device.filesystem();
        let err = fs.write_file("/.config", b"x").unwrap_err();
        assert!(matches!(err, PlatformError::ReadOnly { .. }));
        assert_eq!(device.write_attempts(), 1);
        assert!(device.file("/.config").is_none());
    }

    #[test]
    fn writable_after_remount() {
        let device = MemoryDevice::new();
        device.mount().remount(false).unwrap();
        assert!(device.is_writable());

        let mut fs = device.filesystem();
        fs.write_file("/.config", b"a=1\n").unwrap();
        assert_eq!(device.file("/.config").unwrap(), b"a=1\n");
        assert_eq!(device.remounts(), vec![false]);
    }

    #[test]
    fn bus_claim_refuses_remount() {
        let device = MemoryDevice::new().claimed_by_bus();
        let err = device.mount().remount(false).unwrap_err();
        assert!(matches!(err, PlatformError::MountBusy));
        assert!(!device.is_writable());
        assert_eq!(device.remounts(), vec![false]);
    }

    #[test]
    fn failing_writes_surface_io_errors() {
        let device = MemoryDevice::new().failing_writes();
        device.mount().remount(false).unwrap();
        let err = device.filesystem().write_file("/.config", b"x").unwrap_err();
        assert!(matches!(err, PlatformError::Io(_)));
    }

    // -----------------------------------------------------------------------
    // Directory listing
    // -----------------------------------------------------------------------

    #[test]
    fn list_root_shows_leaf_names() {
        let device = MemoryDevice::new()
            .with_file("/.config", "a")
            .with_file("/lib/x.mpy", "b")
            .with_file("/lib/y.mpy", "c");
        let fs = device.filesystem();
        assert_eq!(fs.list_dir("/").unwrap(), vec![".config", "lib"]);
        assert_eq!(fs.list_dir("/lib/").unwrap(), vec!["x.mpy", "y.mpy"]);
    }

    #[test]
    fn list_empty_root_is_ok() {
        let fs = MemoryDevice::new().filesystem();
        assert!(fs.list_dir("/").unwrap().is_empty());
    }

    #[test]
    fn list_missing_dir_is_not_found() {
        let fs = MemoryDevice::new().filesystem();
        let err = fs.list_dir("/settings").unwrap_err();
        assert!(matches!(err, PlatformError::NotFound { .. }));
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let fs = MemoryDevice::new().filesystem();
        assert!(matches!(
            fs.read_file("/nope").unwrap_err(),
            PlatformError::NotFound { .. }
        ));
    }

    #[test]
    fn paths_are_normalized() {
        let device = MemoryDevice::new().with_file("config", "v");
        assert_eq!(device.file("/config").unwrap(), b"v");
        assert_eq!(device.filesystem().read_file("//config").unwrap(), b"v");
    }

    // -----------------------------------------------------------------------
    // Pin
    // -----------------------------------------------------------------------

    #[test]
    fn floating_pin_reads_pull_level() {
        let mut pin = MockPin::floating();
        pin.configure_input(Pull::Up).unwrap();
        assert!(pin.is_high());
        pin.configure_input(Pull::Down).unwrap();
        assert!(!pin.is_high());
    }

    #[test]
    fn grounded_pin_reads_low() {
        let mut pin = MockPin::grounded();
        pin.configure_input(Pull::Up).unwrap();
        assert!(!pin.is_high());
    }

    #[test]
    fn read_counter_tracks_reads() {
        let mut pin = MockPin::floating();
        let counter = pin.read_counter();
        pin.configure_input(Pull::Up).unwrap();
        let _ = pin.is_high();
        let _ = pin.is_high();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(pin.pull(), Some(Pull::Up));
    }

    #[test]
    fn rejecting_pin_fails_configuration() {
        let mut pin = MockPin::floating().rejecting_config();
        assert!(matches!(
            pin.configure_input(Pull::Up).unwrap_err(),
            PlatformError::PinConfig(_)
        ));
    }
}
