use std::path::Path;

use keystore_codec::DocumentFormat;
use keystore_types::{Entries, Value};
use serde::{Deserialize, Serialize};

use crate::error::{KeystoreError, KeystoreResult};
use crate::path::StorePath;

/// Default location of the persisted document.
pub const DEFAULT_PATH: &str = "/.config";

/// Static configuration of a keystore.
///
/// Everything here is fixed for the store's lifetime. The interlock source is
/// passed separately (see [`Interlock`](keystore_gate::Interlock)) because it
/// may own a hardware pin.
///
/// Can be loaded from TOML:
///
/// ```toml
/// path = "/.config"
/// diagnostics = true
/// format = "lines"
///
/// [defaults]
/// brightness = 5
/// name = "lamp"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    /// Device path of the persisted document.
    pub path: String,
    /// Emit operator-facing diagnostics (missing interlock, absent or
    /// malformed file, failed writes).
    pub diagnostics: bool,
    /// Document format.
    pub format: DocumentFormat,
    /// Declared defaults. Only these keys are read back from storage.
    pub defaults: Entries,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            diagnostics: false,
            format: DocumentFormat::default(),
            defaults: Entries::new(),
        }
    }
}

impl KeystoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Declare one default entry.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Declare several default entries.
    pub fn with_defaults<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.defaults
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(s: &str) -> KeystoreResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| KeystoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> KeystoreResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| KeystoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check that the path names a file.
    pub fn validate(&self) -> KeystoreResult<()> {
        if StorePath::parse(&self.path).file().is_empty() {
            return Err(KeystoreError::Config(format!(
                "path {:?} does not name a file",
                self.path
            )));
        }
        Ok(())
    }
}
