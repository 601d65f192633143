//! The single externally observable result of a sandbox run.

use serde::{Deserialize, Serialize};

/// Exit status for a run that completed without a fault.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for a caught fault, invalid syntax included.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when resource ceilings could not be installed.
pub const EXIT_SETUP_FAILURE: i32 = 126;

/// Prefix of the diagnostic line emitted on failure.
pub const FAILURE_PREFIX: &str = "Execution failed: ";
/// Message reported when the program text does not parse.
pub const INVALID_SYNTAX_MESSAGE: &str = "Invalid syntax detected";

/// Result of running one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Execution finished before any fault or ceiling.
    Success,
    /// A fault was caught; carries its rendered message.
    Failure(String),
}

impl ExecutionOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        ExecutionOutcome::Failure(message.into())
    }

    /// The outcome for program text rejected by the validator.
    pub fn invalid_syntax() -> Self {
        ExecutionOutcome::Failure(INVALID_SYNTAX_MESSAGE.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionOutcome::Success => EXIT_SUCCESS,
            ExecutionOutcome::Failure(_) => EXIT_FAILURE,
        }
    }

    /// The diagnostic line for this outcome, without a trailing newline.
    ///
    /// Success has no diagnostic. Line breaks inside a failure message are
    /// collapsed so the result is always exactly one line.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            ExecutionOutcome::Success => None,
            ExecutionOutcome::Failure(message) => {
                let flat: Vec<&str> = message.lines().map(str::trim_end).collect();
                Some(format!("{FAILURE_PREFIX}{}", flat.join(" ")))
            }
        }
    }
}

/// Extract the failure message from a diagnostic line.
///
/// Returns `None` if the line is not a diagnostic. A trailing newline is
/// tolerated so callers can pass raw captured output.
pub fn parse_diagnostic(line: &str) -> Option<&str> {
    line.trim_end_matches(['\r', '\n']).strip_prefix(FAILURE_PREFIX)
}
