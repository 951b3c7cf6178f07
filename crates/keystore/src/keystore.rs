use keystore_codec::DocumentCodec;
use keystore_gate::{Interlock, MountGate, MountOutcome};
use keystore_platform::{FileSystem, PlatformError};
use keystore_types::{Entries, Value, ValueKind};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::KeystoreConfig;
use crate::describe::Description;
use crate::error::{KeystoreError, KeystoreResult};
use crate::path::StorePath;
use crate::platform::Platform;

/// Operator-facing diagnostic, emitted only when the store's diagnostics
/// toggle is on.
macro_rules! diag {
    ($store:expr, $level:ident, $($arg:tt)+) => {
        if $store.diagnostics {
            tracing::$level!($($arg)+);
        }
    };
}

/// Persistent key/value configuration store.
///
/// Holds the declared defaults and the live values side by side. Storage is
/// only ever written when the mount gate mounted it writable, and every
/// storage problem degrades to "running on defaults, not persistent" instead
/// of failing.
///
/// A keystore is meant to be owned by one control thread; it does no
/// internal locking.
pub struct Keystore {
    path: StorePath,
    defaults: Entries,
    store: Entries,
    dirty: bool,
    mount: MountOutcome,
    diagnostics: bool,
    codec: Box<dyn DocumentCodec>,
    fs: Box<dyn FileSystem>,
}

impl Keystore {
    /// Open a store: resolve the mount through the interlock, then load the
    /// document over the defaults.
    ///
    /// Never fails. Check [`is_persistent`](Self::is_persistent) to learn
    /// whether saves can reach storage.
    pub fn new(config: KeystoreConfig, interlock: Interlock, platform: Platform) -> Self {
        let Platform { mut mount, fs } = platform;
        let outcome = MountGate::new(config.diagnostics).resolve(interlock, mount.as_mut());

        let mut keystore = Self {
            path: StorePath::parse(&config.path),
            store: config.defaults.clone(),
            defaults: config.defaults,
            dirty: false,
            mount: outcome,
            diagnostics: config.diagnostics,
            codec: config.format.codec(),
            fs,
        };

        match keystore.load() {
            Ok(refreshed) => {
                debug!(path = %keystore.path, refreshed, codec = keystore.codec.name(), "store loaded");
            }
            Err(e @ KeystoreError::FileAbsent { .. }) => {
                diag!(keystore, info, "{e}");
            }
            Err(e) => {
                diag!(keystore, warn, error = %e, "falling back to defaults");
            }
        }
        keystore
    }

    /// Refresh declared keys from the persisted document.
    ///
    /// Keys on disk that are not declared defaults are dropped. Returns the
    /// number of keys refreshed.
    fn load(&mut self) -> KeystoreResult<usize> {
        let names = match self.fs.list_dir(self.path.dir()) {
            Ok(names) => names,
            Err(PlatformError::NotFound { .. }) => Vec::new(),
            Err(source) => {
                return Err(KeystoreError::ReadFailed {
                    path: self.path.dir().to_string(),
                    source,
                })
            }
        };
        if !names.iter().any(|name| name == self.path.file()) {
            return Err(KeystoreError::FileAbsent {
                path: self.path.full().to_string(),
            });
        }

        let data = self
            .fs
            .read_file(self.path.full())
            .map_err(|source| KeystoreError::ReadFailed {
                path: self.path.full().to_string(),
                source,
            })?;
        let decoded =
            self.codec
                .decode(&data)
                .map_err(|source| KeystoreError::MalformedDocument {
                    path: self.path.full().to_string(),
                    source,
                })?;

        let mut refreshed = 0;
        let mut dropped = 0;
        for (key, value) in decoded {
            let Some(default) = self.defaults.get(&key) else {
                dropped += 1;
                continue;
            };
            let value = match value {
                Value::Str(raw) if default.kind() != ValueKind::Str => {
                    default.coerce_like(&raw).unwrap_or_else(|e| {
                        debug!(%key, error = %e, "keeping stored value as string");
                        Value::Str(raw)
                    })
                }
                other => other,
            };
            self.store.insert(key, value);
            refreshed += 1;
        }
        if dropped > 0 {
            debug!(dropped, "ignored stored keys without a declared default");
        }
        Ok(refreshed)
    }

    // ---- Queries ----

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// All live entries, in key order.
    pub fn entries(&self) -> &Entries {
        &self.store
    }

    /// The declared defaults.
    pub fn defaults(&self) -> &Entries {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// `true` iff the live store changed since the last save attempt.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `true` iff storage was mounted writable at construction.
    pub fn is_persistent(&self) -> bool {
        self.mount.is_persistent()
    }

    /// What the mount gate did at construction.
    pub fn mount_outcome(&self) -> &MountOutcome {
        &self.mount
    }

    /// Deserialize the live store into a typed view.
    ///
    /// ```rust
    /// # use keystore::{Keystore, KeystoreConfig, Platform};
    /// # use keystore_gate::Interlock;
    /// # use keystore_platform::MemoryDevice;
    /// #[derive(serde::Deserialize)]
    /// struct Lamp {
    ///     brightness: i64,
    ///     name: String,
    /// }
    ///
    /// let config = KeystoreConfig::new()
    ///     .with_default("brightness", 5)
    ///     .with_default("name", "lamp");
    /// let store = Keystore::new(config, Interlock::Unconfigured, Platform::memory(&MemoryDevice::new()));
    /// let lamp: Lamp = store.project().unwrap();
    /// assert_eq!(lamp.brightness, 5);
    /// ```
    pub fn project<T: DeserializeOwned>(&self) -> KeystoreResult<T> {
        let value = serde_json::to_value(&self.store)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Diagnostic dump of the store. Not part of the data contract.
    pub fn describe(&self) -> Description<'_> {
        Description::new(self.path.full(), &self.store, self.dirty, self.is_persistent())
    }

    // ---- Mutation ----

    /// Insert or overwrite entries and mark the store dirty.
    ///
    /// Keys outside the declared defaults are accepted but transient: they
    /// are written by the next save, then filtered out by the next load.
    pub fn set<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.store.insert(key.into(), value.into());
        }
        self.dirty = true;
    }

    /// Delete keys and mark the store dirty. Absent keys are ignored.
    pub fn remove<K: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            self.store.remove(key.as_ref());
        }
        self.dirty = true;
    }

    /// Write the whole live store to storage.
    ///
    /// The dirty flag is cleared once the attempt is over, *even if the write
    /// failed*. This matches the long-standing behaviour of the store; the
    /// returned result is the only reliable signal that the document reached
    /// storage.
    pub fn save(&mut self) -> KeystoreResult<()> {
        let result = self.write_document();
        self.dirty = false;
        if let Err(e) = &result {
            diag!(self, warn, error = %e, "save failed");
        }
        result
    }

    /// [`set`](Self::set) the entries, then [`save`](Self::save).
    pub fn save_with<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> KeystoreResult<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.set(entries);
        self.save()
    }

    /// Like [`save_with`](Self::save_with), but skips the write entirely when
    /// storage is not persistent and reports
    /// [`KeystoreError::NotPersistent`]. The dirty flag is cleared either way.
    pub fn save_if_persistent<K, V>(
        &mut self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> KeystoreResult<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.set(entries);
        if !self.is_persistent() {
            self.dirty = false;
            let e = KeystoreError::NotPersistent {
                path: self.path.full().to_string(),
            };
            diag!(self, info, "{e}");
            return Err(e);
        }
        self.save()
    }

    fn write_document(&mut self) -> KeystoreResult<()> {
        let data = self.codec.encode(&self.store).map_err(KeystoreError::Encode)?;
        self.fs
            .write_file(self.path.full(), &data)
            .map_err(|source| KeystoreError::WriteFailed {
                path: self.path.full().to_string(),
                source,
            })?;
        debug!(path = %self.path, len = data.len(), entries = self.store.len(), "store saved");
        Ok(())
    }
}

impl std::fmt::Debug for Keystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keystore")
            .field("path", &self.path.full())
            .field("entries", &self.store.len())
            .field("dirty", &self.dirty)
            .field("persistent", &self.is_persistent())
            .finish()
    }
}
