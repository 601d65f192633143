//! rf-protocol: Shared outcome types for ringfence.
//!
//! This crate defines what a sandbox run reports to the outside world: the
//! in-process [`ExecutionOutcome`], the exit codes it maps to, and the
//! [`Termination`] classification a launching process applies to the
//! status it observes.

pub mod outcome;
pub mod termination;

pub use outcome::{
    parse_diagnostic, ExecutionOutcome, EXIT_FAILURE, EXIT_SETUP_FAILURE, EXIT_SUCCESS,
    FAILURE_PREFIX, INVALID_SYNTAX_MESSAGE,
};
pub use termination::{signal_name, Termination};
