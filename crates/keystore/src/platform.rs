use std::path::PathBuf;

use keystore_platform::{DirFileSystem, FileSystem, HostMount, MemoryDevice, StorageMount};

/// The environment capabilities a keystore runs against.
///
/// The mount capability is consumed by the mount gate during construction;
/// the filesystem stays with the store.
pub struct Platform {
    pub mount: Box<dyn StorageMount>,
    pub fs: Box<dyn FileSystem>,
}

impl Platform {
    pub fn new(mount: impl StorageMount + 'static, fs: impl FileSystem + 'static) -> Self {
        Self {
            mount: Box::new(mount),
            fs: Box::new(fs),
        }
    }

    /// Capabilities backed by an in-memory device.
    pub fn memory(device: &MemoryDevice) -> Self {
        Self::new(device.mount(), device.filesystem())
    }

    /// Capabilities backed by a host directory acting as storage root.
    pub fn host_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(HostMount::new(root.clone()), DirFileSystem::new(root))
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
