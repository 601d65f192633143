//! Classification of how a sandbox process ended.
//!
//! Only faults caught in-process produce a diagnostic line. Ceiling breaches
//! kill the process out of band, so whoever launched it has to read the
//! wait status instead of the output. [`Termination`] is that reading.

use std::process::ExitStatus;

use serde::{Deserialize, Serialize};

use crate::outcome::{EXIT_FAILURE, EXIT_SETUP_FAILURE, EXIT_SUCCESS};

/// How a finished sandbox process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Exit 0: the program ran to completion.
    Succeeded,
    /// Exit 1: a fault was caught and a diagnostic line was written.
    Failed,
    /// Exit 126: ceilings could not be installed, nothing was executed.
    SetupFailed,
    /// Any other exit code, or death by signal.
    ResourceExceeded {
        code: Option<i32>,
        signal: Option<i32>,
    },
}

impl Termination {
    pub fn from_status(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;
        Self::from_parts(status.code(), signal)
    }

    /// Classify from a raw exit code and terminating signal.
    pub fn from_parts(code: Option<i32>, signal: Option<i32>) -> Self {
        match (code, signal) {
            (Some(EXIT_SUCCESS), None) => Termination::Succeeded,
            (Some(EXIT_FAILURE), None) => Termination::Failed,
            (Some(EXIT_SETUP_FAILURE), None) => Termination::SetupFailed,
            (code, signal) => Termination::ResourceExceeded { code, signal },
        }
    }

    /// True when the process was killed rather than exiting on its own.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Termination::ResourceExceeded { signal: Some(_), .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Termination::Succeeded => "succeeded".to_string(),
            Termination::Failed => "failed with a caught fault".to_string(),
            Termination::SetupFailed => "could not install resource limits".to_string(),
            Termination::ResourceExceeded {
                signal: Some(sig), ..
            } => match signal_name(*sig) {
                Some(name) => format!("killed by {name}"),
                None => format!("killed by signal {sig}"),
            },
            Termination::ResourceExceeded { code, .. } => match code {
                Some(c) => format!("exited with unexpected status {c}"),
                None => "terminated abnormally".to_string(),
            },
        }
    }
}

/// Name of a signal a ceiling breach commonly ends in.
pub fn signal_name(signal: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        let name = match signal {
            libc::SIGXCPU => "SIGXCPU",
            libc::SIGXFSZ => "SIGXFSZ",
            libc::SIGKILL => "SIGKILL",
            libc::SIGSEGV => "SIGSEGV",
            libc::SIGABRT => "SIGABRT",
            libc::SIGBUS => "SIGBUS",
            _ => return None,
        };
        Some(name)
    }
    #[cfg(not(unix))]
    {
        let _ = signal;
        None
    }
}
