//! Environment capabilities for the interlocked keystore.
//!
//! The keystore never touches hardware or the filesystem directly. It is
//! handed three capabilities:
//!
//! - [`StorageMount`] -- remount the backing storage read-only or writable
//! - [`InterlockPin`] -- a digital input with a defined pull, read once
//! - [`FileSystem`] -- list a directory, read and write whole files
//!
//! # Backends
//!
//! - [`MemoryDevice`] -- shared in-memory device for tests and simulation.
//!   Its [`MemoryFileSystem`] honours the mount mode set through its
//!   [`MemoryMount`], and it counts remounts and writes for inspection.
//! - [`DirFileSystem`] / [`HostMount`] -- a host directory standing in for
//!   the device's root filesystem.
//!
//! Device paths are always `/`-separated and rooted at the storage root,
//! regardless of the host platform.

pub mod error;
pub mod host;
pub mod memory;
pub mod traits;

pub use error::{PlatformError, Result};
pub use host::{DirFileSystem, HostMount};
pub use memory::{MemoryDevice, MemoryFileSystem, MemoryMount, MockPin};
pub use traits::{FileSystem, InterlockPin, Pull, StorageMount};
