//! Host-directory backends.
//!
//! On a development machine there is no flash chip and no remount call. A
//! directory stands in for the device's storage root: device path `/.config`
//! maps to `<root>/.config`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::traits::{FileSystem, StorageMount};

/// [`FileSystem`] rooted at a host directory.
#[derive(Clone, Debug)]
pub struct DirFileSystem {
    root: PathBuf,
}

impl DirFileSystem {
    /// Map device paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The host directory acting as storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, device_path: &str) -> PathBuf {
        device_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

fn not_found_as(path: &str) -> impl FnOnce(std::io::Error) -> PlatformError + '_ {
    move |e| match e.kind() {
        ErrorKind::NotFound => PlatformError::NotFound {
            path: path.to_string(),
        },
        ErrorKind::PermissionDenied => PlatformError::ReadOnly {
            path: path.to_string(),
        },
        _ => PlatformError::Io(e),
    }
}

impl FileSystem for DirFileSystem {
    fn list_dir(&self, dir: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.resolve(dir)).map_err(not_found_as(dir))? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(self.resolve(path)).map_err(not_found_as(path))
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(path);
        fs::write(&target, data).map_err(not_found_as(path))?;
        debug!(path = %target.display(), len = data.len(), "file written");
        Ok(())
    }
}

/// [`StorageMount`] for a host directory.
///
/// A host directory cannot really be remounted. Read-only requests always
/// succeed. Writable requests succeed only when the directory exists and is
/// not marked read-only, so a write-protected root behaves like storage held
/// by another writer.
#[derive(Clone, Debug)]
pub struct HostMount {
    root: PathBuf,
}

impl HostMount {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl StorageMount for HostMount {
    fn remount(&mut self, read_only: bool) -> Result<()> {
        if read_only {
            return Ok(());
        }
        let metadata = fs::metadata(&self.root).map_err(|e| {
            PlatformError::RemountForbidden(format!("{}: {e}", self.root.display()))
        })?;
        if !metadata.is_dir() {
            return Err(PlatformError::RemountForbidden(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(PlatformError::RemountForbidden(format!(
                "{} is write-protected",
                self.root.display()
            )));
        }
        debug!(root = %self.root.display(), "host root accepted as writable");
        Ok(())
    }
}
