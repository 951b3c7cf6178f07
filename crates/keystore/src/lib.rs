//! Interlocked persistent keystore.
//!
//! A small key/value configuration store for devices whose storage may be
//! read-only, writable, or held by a host computer over USB. The store:
//!
//! 1. starts from caller-declared defaults,
//! 2. only mounts storage writable when a physical interlock says no other
//!    writer can be attached,
//! 3. refreshes *declared* keys from the persisted document and silently
//!    drops anything else found there,
//! 4. tracks unsaved changes and rewrites the whole document on save.
//!
//! Nothing here panics or aborts on storage trouble: a denied remount, a
//! missing or corrupt file, a failed write all degrade to a logged
//! diagnostic and a usable in-memory store.
//!
//! # Quick Start
//!
//! ```rust
//! use keystore::{Keystore, KeystoreConfig, Platform};
//! use keystore_gate::Interlock;
//! use keystore_platform::{MemoryDevice, MockPin};
//!
//! let device = MemoryDevice::new();
//! let config = KeystoreConfig::new().with_default("brightness", "5");
//!
//! // The operator grounded the interlock pin: storage is ours to write.
//! let mut store = Keystore::new(config, Interlock::pin(MockPin::grounded()), Platform::memory(&device));
//! assert!(store.is_persistent());
//!
//! store.save_with([("brightness", "9")]).unwrap();
//! assert!(!store.is_dirty());
//! ```
//!
//! # Lifecycle
//!
//! `Constructing -> MountResolved -> Loaded -> {Clean <-> Dirty}`. `set` and
//! `remove` make the store dirty; every `save` attempt makes it clean again,
//! whether or not the write succeeded.

pub mod config;
pub mod describe;
pub mod error;
pub mod keystore;
pub mod path;
pub mod platform;

pub use config::{KeystoreConfig, DEFAULT_PATH};
pub use describe::Description;
pub use error::{KeystoreError, KeystoreResult};
pub use keystore::Keystore;
pub use path::StorePath;
pub use platform::Platform;

// Re-export the types callers need to build and query a store.
pub use keystore_codec::DocumentFormat;
pub use keystore_gate::{Interlock, MountMode, MountOutcome};
pub use keystore_types::{Entries, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use keystore_platform::{MemoryDevice, MockPin};
    use proptest::prelude::*;

    fn brightness_defaults() -> KeystoreConfig {
        KeystoreConfig::new().with_default("brightness", "5")
    }

    fn open(config: KeystoreConfig, interlock: Interlock, device: &MemoryDevice) -> Keystore {
        Keystore::new(config, interlock, Platform::memory(device))
    }

    // -----------------------------------------------------------------------
    // Scenario A: no stored file
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_a_defaults_without_file() {
        let store = open(brightness_defaults(), Interlock::Unconfigured, &MemoryDevice::new());
        assert_eq!(store.get("brightness"), Some(&Value::from("5")));
        assert!(!store.is_dirty());
    }

    // -----------------------------------------------------------------------
    // Scenario B: stored document with a stale key
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_b_stored_value_wins_stale_key_dropped() {
        let device = MemoryDevice::new()
            .with_file("/.config", r#"{"brightness":"9","stale_key":"x"}"#);
        let store = open(brightness_defaults(), Interlock::Unconfigured, &device);
        assert_eq!(store.get("brightness"), Some(&Value::from("9")));
        assert_eq!(store.get("stale_key"), None);
    }

    // -----------------------------------------------------------------------
    // Scenario C: transient keys are saved, then filtered on reload
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_c_transient_key_written_then_filtered() {
        let device = MemoryDevice::new();
        let config = KeystoreConfig::new().with_default("a", "1");

        let mut store = open(config.clone(), Interlock::Disabled, &device);
        store.set([("b", "2")]);
        store.save().unwrap();

        // save writes the live store as-is, transient key included...
        let on_disk = device.file("/.config").unwrap();
        assert_eq!(on_disk, br#"{"a":"1","b":"2"}"#);

        // ...but load only admits declared keys.
        let reopened = open(config, Interlock::Disabled, &device);
        assert_eq!(reopened.get("b"), None);
        assert_eq!(reopened.get("a"), Some(&Value::from("1")));
    }

    // -----------------------------------------------------------------------
    // Scenario D: interlock decides persistence
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_d_asserted_interlock_is_persistent() {
        let store = open(
            brightness_defaults(),
            Interlock::pin(MockPin::grounded()),
            &MemoryDevice::new(),
        );
        assert!(store.is_persistent());
    }

    #[test]
    fn scenario_d_idle_interlock_is_not_persistent() {
        let store = open(
            brightness_defaults(),
            Interlock::pin(MockPin::floating()),
            &MemoryDevice::new(),
        );
        assert!(!store.is_persistent());
        assert!(matches!(
            store.mount_outcome(),
            MountOutcome::Mounted(MountMode::ReadOnly)
        ));
    }

    // -----------------------------------------------------------------------
    // Safety: no interlock means hands off the device
    // -----------------------------------------------------------------------

    #[test]
    fn no_interlock_never_touches_device_during_construction() {
        let device = MemoryDevice::new().with_file("/.config", r#"{"brightness":"9"}"#);
        let store = open(
            brightness_defaults().with_diagnostics(true),
            Interlock::Unconfigured,
            &device,
        );
        assert!(!store.is_persistent());
        assert!(matches!(store.mount_outcome(), MountOutcome::Skipped));
        assert!(device.remounts().is_empty());
        assert_eq!(device.write_attempts(), 0);
        // Reading is still allowed.
        assert_eq!(store.get("brightness"), Some(&Value::from("9")));
    }

    #[test]
    fn usb_claimed_storage_degrades_to_memory() {
        let device = MemoryDevice::new().claimed_by_bus();
        let mut store = open(
            brightness_defaults().with_diagnostics(true),
            Interlock::pin(MockPin::grounded()),
            &device,
        );
        assert!(!store.is_persistent());
        assert!(store.mount_outcome().error().is_some());

        store.set([("brightness", "1")]);
        assert!(store.save().is_err());
        assert!(!store.is_dirty());
        assert_eq!(store.get("brightness"), Some(&Value::from("1")));
    }

    // -----------------------------------------------------------------------
    // Dirty flag state machine
    // -----------------------------------------------------------------------

    #[test]
    fn dirty_cycles_through_set_remove_save() {
        let mut store = open(brightness_defaults(), Interlock::Disabled, &MemoryDevice::new());
        assert!(!store.is_dirty());
        store.set([("brightness", "6")]);
        assert!(store.is_dirty());
        store.save().unwrap();
        assert!(!store.is_dirty());
        store.remove(["brightness"]);
        assert!(store.is_dirty());
        store.save().unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn removed_default_returns_after_reload() {
        let device = MemoryDevice::new();
        let mut store = open(brightness_defaults(), Interlock::Disabled, &device);
        store.set([("brightness", "8")]);
        store.save().unwrap();
        store.remove(["brightness"]);
        store.save().unwrap();

        let reopened = open(brightness_defaults(), Interlock::Disabled, &device);
        assert_eq!(reopened.get("brightness"), Some(&Value::from("5")));
    }

    #[test]
    fn describe_reports_state() {
        let mut store = open(brightness_defaults(), Interlock::Unconfigured, &MemoryDevice::new());
        store.set([("brightness", "7")]);
        let text = store.describe().to_string();
        assert!(text.starts_with("Filename: /.config\n"));
        assert!(text.contains("brightness: 7\n"));
        assert!(text.contains("File is dirty\n"));
        assert!(text.contains("Storage is not persistent\n"));
    }

    // -----------------------------------------------------------------------
    // Formats and host storage
    // -----------------------------------------------------------------------

    #[test]
    fn lines_format_persists_across_reopen() {
        let device = MemoryDevice::new();
        let config = KeystoreConfig::new()
            .with_format(DocumentFormat::Lines)
            .with_path("/lamp.cfg")
            .with_default("brightness", 5)
            .with_default("motd", "hi");

        let mut store = open(config.clone(), Interlock::Disabled, &device);
        store
            .save_with([("brightness", Value::Int(9)), ("motd", Value::from("a=b\nc"))])
            .unwrap();
        assert_eq!(device.file("/lamp.cfg").unwrap(), b"brightness=9\nmotd=a=b\\nc\n");

        let reopened = open(config, Interlock::Disabled, &device);
        assert_eq!(reopened.get("brightness"), Some(&Value::Int(9)));
        assert_eq!(reopened.get("motd"), Some(&Value::from("a=b\nc")));
    }

    #[test]
    fn host_directory_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = brightness_defaults().with_path("/settings.json");

        let mut store = Keystore::new(config.clone(), Interlock::Disabled, Platform::host_dir(dir.path()));
        assert!(store.is_persistent());
        store.save_with([("brightness", "3")]).unwrap();
        assert!(dir.path().join("settings.json").exists());

        let reopened = Keystore::new(config, Interlock::Unconfigured, Platform::host_dir(dir.path()));
        assert_eq!(reopened.get("brightness"), Some(&Value::from("3")));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn defaults_strategy() -> impl Strategy<Value = Entries> {
        prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,12}", 1..8)
            .prop_map(|m| m.into_iter().map(|(k, v)| (k, Value::Str(v))).collect())
    }

    proptest! {
        #[test]
        fn save_then_reopen_yields_defaults_overridden(
            defaults in defaults_strategy(),
            picks in prop::collection::vec((any::<prop::sample::Index>(), "[ -~]{0,12}"), 0..6),
            lines in any::<bool>(),
        ) {
            let format = if lines { DocumentFormat::Lines } else { DocumentFormat::Json };
            let config = KeystoreConfig::new().with_format(format).with_defaults(defaults.clone());
            let keys: Vec<&String> = defaults.keys().collect();
            let overrides: Entries = picks
                .into_iter()
                .map(|(idx, v)| (idx.get(&keys).to_string(), Value::Str(v)))
                .collect();

            let device = MemoryDevice::new();
            let mut store = open(config.clone(), Interlock::Disabled, &device);
            store.set(overrides.clone());
            store.save().unwrap();

            let reopened = open(config, Interlock::Disabled, &device);
            let mut expected = defaults;
            expected.extend(overrides);
            prop_assert_eq!(reopened.entries(), &expected);
        }

        #[test]
        fn unknown_keys_never_load(
            defaults in defaults_strategy(),
            foreign in prop::collection::btree_map("[A-Z]{1,8}", "[ -~]{0,12}", 1..8),
        ) {
            let doc = serde_json::to_vec(&foreign).unwrap();
            let device = MemoryDevice::new().with_file("/.config", doc);
            let store = open(
                KeystoreConfig::new().with_defaults(defaults.clone()),
                Interlock::Unconfigured,
                &device,
            );
            for key in foreign.keys() {
                prop_assert!(store.get(key).is_none());
            }
            prop_assert_eq!(store.entries(), &defaults);
        }
    }
}
