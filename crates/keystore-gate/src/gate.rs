use keystore_platform::StorageMount;
use tracing::{debug, info, warn};

use crate::error::GateError;
use crate::interlock::{Interlock, MountMode};

/// Operator hint logged when no interlock is configured.
pub const OPT_OUT_HINT: &str =
    "an interlock pin must be provided as a safety precaution; pass Interlock::Disabled to bypass this check";

// ---------------------------------------------------------------------------
// MountOutcome
// ---------------------------------------------------------------------------

/// What the gate did to the storage mount.
#[derive(Debug)]
pub enum MountOutcome {
    /// No interlock configured: no remount was attempted.
    Skipped,
    /// The remount succeeded in the given mode.
    Mounted(MountMode),
    /// The gate could not establish a mount; storage was left as it was.
    Failed(GateError),
}

impl MountOutcome {
    /// `true` iff storage ended up mounted writable.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Mounted(MountMode::Writable))
    }

    /// The failure, if the gate could not mount.
    pub fn error(&self) -> Option<&GateError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MountGate
// ---------------------------------------------------------------------------

/// Decides the storage mount mode from the interlock and applies it.
///
/// The gate is the only component that remounts storage, and a keystore runs
/// it exactly once, at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct MountGate {
    diagnostics: bool,
}

impl MountGate {
    /// `diagnostics` enables the operator-facing warnings.
    pub fn new(diagnostics: bool) -> Self {
        Self { diagnostics }
    }

    /// Decide the mode the interlock asks for.
    ///
    /// Returns `Ok(None)` when no interlock is configured. A pin is configured
    /// with its pull and sampled exactly once.
    pub fn decide(&self, interlock: Interlock) -> Result<Option<MountMode>, GateError> {
        match interlock {
            Interlock::Unconfigured => Ok(None),
            Interlock::Disabled => Ok(Some(MountMode::Writable)),
            Interlock::Pin { mut pin, pull } => {
                pin.configure_input(pull)
                    .map_err(GateError::InterlockFault)?;
                let level = pin.is_high();
                let asserted = level != pull.idle_level();
                debug!(level, asserted, ?pull, "interlock sampled");
                Ok(Some(if asserted {
                    MountMode::Writable
                } else {
                    MountMode::ReadOnly
                }))
            }
        }
    }

    /// Decide the mount mode and remount `mount` accordingly.
    ///
    /// Never fails: a refused remount or an unusable pin is logged and
    /// returned as [`MountOutcome::Failed`].
    pub fn resolve(&self, interlock: Interlock, mount: &mut dyn StorageMount) -> MountOutcome {
        let mode = match self.decide(interlock) {
            Ok(Some(mode)) => mode,
            Ok(None) => {
                if self.diagnostics {
                    warn!("{OPT_OUT_HINT}");
                }
                return MountOutcome::Skipped;
            }
            Err(e) => {
                if self.diagnostics {
                    warn!(error = %e, "interlock unusable, not remounting storage");
                }
                return MountOutcome::Failed(e);
            }
        };

        match mount.remount(mode.read_only()) {
            Ok(()) => {
                debug!(%mode, "storage remounted");
                MountOutcome::Mounted(mode)
            }
            Err(source) => {
                let e = GateError::MountDenied {
                    requested: mode,
                    source,
                };
                if self.diagnostics {
                    info!(error = %e, "mounted externally, not remounting storage");
                }
                MountOutcome::Failed(e)
            }
        }
    }
}
