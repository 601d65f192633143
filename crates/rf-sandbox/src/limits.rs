use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SandboxError;

const MIB: u64 = 1024 * 1024;

/// A process resource that ringfence puts a ceiling on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// `RLIMIT_CPU`, in seconds.
    CpuTime,
    /// `RLIMIT_AS`, in bytes.
    AddressSpace,
    /// `RLIMIT_FSIZE`, in bytes.
    FileSize,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::CpuTime, Resource::AddressSpace, Resource::FileSize];

    #[cfg(unix)]
    fn raw(self) -> RawResource {
        match self {
            Resource::CpuTime => libc::RLIMIT_CPU,
            Resource::AddressSpace => libc::RLIMIT_AS,
            Resource::FileSize => libc::RLIMIT_FSIZE,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::CpuTime => f.write_str("cpu time"),
            Resource::AddressSpace => f.write_str("address space"),
            Resource::FileSize => f.write_str("file size"),
        }
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
type RawResource = libc::__rlimit_resource_t;
#[cfg(all(unix, not(all(target_os = "linux", target_env = "gnu"))))]
type RawResource = libc::c_int;

/// The three ceilings installed before any untrusted input is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// CPU-time ceiling in seconds.
    pub cpu_seconds: u64,
    /// Virtual address-space ceiling in bytes.
    pub memory_bytes: u64,
    /// Largest file the process may write, in bytes.
    pub output_bytes: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_seconds: 5,
            memory_bytes: 512 * MIB,
            output_bytes: MIB,
        }
    }
}

impl ResourceLimits {
    /// The configured value for one resource.
    pub fn get(&self, resource: Resource) -> u64 {
        match resource {
            Resource::CpuTime => self.cpu_seconds,
            Resource::AddressSpace => self.memory_bytes,
            Resource::FileSize => self.output_bytes,
        }
    }

    /// Reject ceilings that cannot be installed meaningfully.
    pub fn validate(&self) -> Result<(), SandboxError> {
        for resource in Resource::ALL {
            if self.get(resource) == 0 {
                return Err(SandboxError::InvalidLimit {
                    resource,
                    reason: "ceiling must be greater than zero",
                });
            }
        }
        Ok(())
    }

    /// Validate and install all three ceilings on the current process.
    pub fn install(&self) -> Result<(), SandboxError> {
        self.validate()?;
        for resource in Resource::ALL {
            let value = self.get(resource);
            set_limit(resource, value)?;
            debug!(%resource, value, "resource ceiling installed");
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_limit(resource: Resource, value: u64) -> Result<(), SandboxError> {
    let rlim = libc::rlimit {
        rlim_cur: value as libc::rlim_t,
        rlim_max: value as libc::rlim_t,
    };
    // SAFETY: rlim is a valid rlimit and raw() yields a valid resource constant.
    if unsafe { libc::setrlimit(resource.raw(), &rlim) } != 0 {
        return Err(SandboxError::Install {
            resource,
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_limit(_resource: Resource, _value: u64) -> Result<(), SandboxError> {
    Err(SandboxError::Unsupported)
}

/// Read back the `(soft, hard)` pair currently in force for `resource`.
#[cfg(unix)]
pub fn current(resource: Resource) -> io::Result<(u64, u64)> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: rlim is a valid, writable rlimit.
    if unsafe { libc::getrlimit(resource.raw(), &mut rlim) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok((rlim.rlim_cur as u64, rlim.rlim_max as u64))
}

#[cfg(not(unix))]
pub fn current(_resource: Resource) -> io::Result<(u64, u64)> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "resource limits are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `f` in a forked child and return its exit code. Limits are
    /// process-wide and irreversible, so they must never touch the harness.
    #[cfg(unix)]
    fn in_child(f: impl FnOnce() -> i32) -> i32 {
        // SAFETY: the child only calls setrlimit/getrlimit and _exit.
        let pid = unsafe { libc::fork() };
        assert!(pid >= 0, "fork failed");
        if pid == 0 {
            let code = f();
            unsafe { libc::_exit(code) };
        }
        let mut status = 0;
        // SAFETY: pid is our child and status is writable.
        let waited = unsafe { libc::waitpid(pid, &mut status, 0) };
        assert_eq!(waited, pid);
        assert!(libc::WIFEXITED(status), "child did not exit normally");
        libc::WEXITSTATUS(status)
    }

    #[test]
    fn defaults_match_observed_behavior() {
        let limits = ResourceLimits::default();
        assert_eq!(limits.cpu_seconds, 5);
        assert_eq!(limits.memory_bytes, 512 * 1024 * 1024);
        assert_eq!(limits.output_bytes, 1024 * 1024);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn zero_ceiling_is_rejected() {
        let limits = ResourceLimits {
            memory_bytes: 0,
            ..Default::default()
        };
        let err = limits.validate().unwrap_err();
        assert!(matches!(
            err,
            SandboxError::InvalidLimit {
                resource: Resource::AddressSpace,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "invalid address space limit: ceiling must be greater than zero"
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let limits: ResourceLimits = toml::from_str("cpu_seconds = 2").unwrap();
        assert_eq!(limits.cpu_seconds, 2);
        assert_eq!(limits.memory_bytes, 512 * 1024 * 1024);
        assert_eq!(limits.output_bytes, 1024 * 1024);
    }

    #[cfg(unix)]
    #[test]
    fn install_sets_soft_and_hard_equal() {
        let code = in_child(|| {
            let limits = ResourceLimits {
                cpu_seconds: 3,
                memory_bytes: 256 * MIB,
                output_bytes: 4096,
            };
            if limits.install().is_err() {
                return 10;
            }
            for resource in Resource::ALL {
                match current(resource) {
                    Ok((soft, hard)) if soft == hard && soft == limits.get(resource) => {}
                    _ => return 11,
                }
            }
            0
        });
        assert_eq!(code, 0);
    }

    #[cfg(unix)]
    #[test]
    fn installed_limits_cannot_be_raised_unprivileged() {
        // Root may raise hard limits, so the property only holds for others.
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("skipping test: running as root");
            return;
        }
        let code = in_child(|| {
            let tight = ResourceLimits {
                cpu_seconds: 2,
                ..Default::default()
            };
            if tight.install().is_err() {
                return 10;
            }
            let looser = ResourceLimits {
                cpu_seconds: 60,
                ..Default::default()
            };
            match looser.install() {
                Err(SandboxError::Install {
                    resource: Resource::CpuTime,
                    ..
                }) => 0,
                _ => 12,
            }
        });
        assert_eq!(code, 0);
    }

    #[cfg(unix)]
    #[test]
    fn current_reads_harness_limits() {
        let (soft, hard) = current(Resource::CpuTime).unwrap();
        assert!(soft <= hard);
    }
}
