use keystore_platform::PlatformError;

use crate::interlock::MountMode;

/// Why the gate could not establish the mount it wanted.
///
/// These never escape as failures: the gate records them in
/// [`MountOutcome::Failed`](crate::MountOutcome::Failed) and the store runs
/// without persistence.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The remount call was refused, typically because an external bus owns
    /// the storage.
    #[error("remount {requested} denied: {source}")]
    MountDenied {
        requested: MountMode,
        #[source]
        source: PlatformError,
    },

    /// The interlock pin could not be configured as an input.
    #[error("interlock input unavailable: {0}")]
    InterlockFault(#[source] PlatformError),
}

impl GateError {
    /// The mount mode the gate was trying to establish, if it got that far.
    pub fn requested(&self) -> Option<MountMode> {
        match self {
            Self::MountDenied { requested, .. } => Some(*requested),
            Self::InterlockFault(_) => None,
        }
    }
}
