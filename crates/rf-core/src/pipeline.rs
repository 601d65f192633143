//! The one-shot sandbox pipeline: install limits, read, validate, run.

use std::io::{self, Read, Write};

use rf_protocol::ExecutionOutcome;
use rf_sandbox::{ResourceLimits, SandboxError};
use tracing::debug;

use crate::config::Config;

/// Run one program read from `input` under `config`.
///
/// `install` is called before a single byte of `input` is read; if it fails
/// the error is returned and `input` is never touched. Production passes
/// [`rf_sandbox::install`]. Everything after installation ends in an
/// [`ExecutionOutcome`]: unreadable input and invalid syntax take the same
/// failure path as runtime faults.
pub fn execute<R: Read>(
    config: &Config,
    install: impl FnOnce(&ResourceLimits) -> Result<(), SandboxError>,
    mut input: R,
) -> Result<ExecutionOutcome, SandboxError> {
    install(&config.limits)?;

    let mut text = String::new();
    if let Err(e) = input.read_to_string(&mut text) {
        debug!(error = %e, "failed to read program text");
        return Ok(ExecutionOutcome::failure(e.to_string()));
    }

    let namespace = config.namespace.build();
    let program = match namespace.validate(&text) {
        Ok(program) => program,
        Err(e) => {
            debug!(reason = %e.reason, "rejecting program before execution");
            return Ok(ExecutionOutcome::invalid_syntax());
        }
    };

    Ok(namespace.run(&program))
}

/// Write the outcome's diagnostic line, if any, to `out` and flush it.
///
/// A failed write is logged and returned; the exit status still carries
/// the outcome.
pub fn emit_diagnostic<W: Write>(out: &mut W, outcome: &ExecutionOutcome) -> io::Result<()> {
    let Some(line) = outcome.diagnostic() else {
        return Ok(());
    };
    let result = writeln!(out, "{line}").and_then(|()| out.flush());
    if let Err(e) = &result {
        debug!(error = %e, %line, "failed to write diagnostic line");
    }
    result
}
