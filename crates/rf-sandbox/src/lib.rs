//! OS-level resource ceilings for ringfence.
//!
//! Installs kernel-enforced limits on CPU time, address-space size, and the
//! size of any file the process writes. Limits apply to the current process
//! and are irreversible: soft and hard values are set equal, so nothing that
//! runs afterwards can raise them again.
//!
//! # Architecture
//!
//! The `ringfence` binary installs the ceilings as its first act, before the
//! untrusted program text is read:
//! 1. Resolve [`ResourceLimits`] from configuration (or the defaults)
//! 2. [`install`] them (`setrlimit`, soft = hard)
//! 3. Only then read, validate, and run the program
//!
//! A breach is not an error this crate reports. The kernel delivers a signal
//! (`SIGXCPU`, `SIGXFSZ`) or allocation fails and the process aborts; the
//! launcher sees it in the wait status.
//!
//! # Usage
//!
//! ```no_run
//! use rf_sandbox::{install, ResourceLimits};
//!
//! let limits = ResourceLimits::default();
//! install(&limits).expect("limit installation failed");
//! // Process now dies if it exceeds 5s CPU, 512 MiB address space, or 1 MiB files
//! ```

pub mod limits;

pub use limits::{current, Resource, ResourceLimits};

use thiserror::Error;

/// Errors from limit installation. All of them are fatal to the caller.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// A configured ceiling is unusable.
    #[error("invalid {resource} limit: {reason}")]
    InvalidLimit {
        resource: Resource,
        reason: &'static str,
    },
    /// The kernel refused to set a ceiling.
    #[error("failed to set {resource} limit: {source}")]
    Install {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },
    /// No rlimit support on this platform.
    #[error("resource limits are not supported on this platform")]
    Unsupported,
}

/// Install the ceilings on the current process. Irreversible.
///
/// On unix, uses `setrlimit` with soft = hard for each resource.
/// On other platforms, returns [`SandboxError::Unsupported`].
pub fn install(limits: &ResourceLimits) -> Result<(), SandboxError> {
    limits.install()
}
