//! Execution of validated programs and capture of every in-process fault.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rf_protocol::ExecutionOutcome;
use rhai::Scope;
use tracing::debug;

use crate::namespace::Namespace;
use crate::validator::ValidatedProgram;

/// Run `program` inside `namespace` with a fresh, empty scope.
///
/// Every evaluation error becomes `Failure` with the error's rendered
/// message, whatever its kind: a missing capability fails exactly like a
/// division by zero. A panic raised by a host binding is captured the same
/// way. Ceiling breaches never reach this function; the OS ends the process.
pub fn run(namespace: &Namespace, program: &ValidatedProgram) -> ExecutionOutcome {
    let mut scope = Scope::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        namespace
            .engine()
            .run_ast_with_scope(&mut scope, program.ast())
    }));

    match result {
        Ok(Ok(())) => {
            debug!("program completed");
            ExecutionOutcome::Success
        }
        Ok(Err(err)) => {
            debug!(error = %err, "program raised a fault");
            ExecutionOutcome::failure(err.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            debug!(%message, "host binding panicked");
            ExecutionOutcome::failure(message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "host binding panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Grant;

    fn run_text(ns: &Namespace, text: &str) -> ExecutionOutcome {
        let program = ns.validate(text).expect("program should parse");
        run(ns, &program)
    }

    fn failure_message(outcome: ExecutionOutcome) -> String {
        match outcome {
            ExecutionOutcome::Failure(message) => message,
            ExecutionOutcome::Success => panic!("expected a failure"),
        }
    }

    #[test]
    fn plain_computation_succeeds() {
        let ns = Namespace::empty();
        let outcome = run_text(
            &ns,
            "let total = 0; let i = 0; while i < 10 { total += i; i += 1; }",
        );
        assert_eq!(outcome, ExecutionOutcome::Success);
    }

    #[test]
    fn division_by_zero_is_captured() {
        let ns = Namespace::empty();
        let message = failure_message(run_text(&ns, "let x = 1 / 0;"));
        assert!(message.contains("Division by zero"), "got: {message}");
    }

    #[test]
    fn thrown_value_becomes_message() {
        let ns = Namespace::empty();
        let message = failure_message(run_text(&ns, "throw \"boom\";"));
        assert!(message.contains("boom"), "got: {message}");
    }

    #[test]
    fn missing_function_fails_like_any_fault() {
        let ns = Namespace::with_grants(&Grant::ALL);
        let message = failure_message(run_text(&ns, "open(\"/etc/passwd\")"));
        assert!(message.contains("open"), "got: {message}");
    }

    #[test]
    fn missing_variable_fails_like_any_fault() {
        let ns = Namespace::empty();
        let message = failure_message(run_text(&ns, "secret_token + 1"));
        assert!(message.contains("secret_token"), "got: {message}");
    }

    #[test]
    fn scope_does_not_carry_over_between_runs() {
        let ns = Namespace::empty();
        assert!(run_text(&ns, "let leaked = 1;").is_success());
        assert!(!run_text(&ns, "leaked").is_success());
    }

    #[test]
    fn same_program_same_outcome() {
        let ns = Namespace::empty();
        let program = ns.validate("let x = 10 % 0;").unwrap();
        let first = run(&ns, &program);
        let second = run(&ns, &program);
        assert!(!first.is_success());
        assert_eq!(first, second);
    }

    #[test]
    fn host_panic_is_captured() {
        let mut ns = Namespace::empty();
        ns.bindings_mut()
            .register_fn("explode", || -> i64 { panic!("host fault") });
        let message = failure_message(run_text(&ns, "explode()"));
        assert_eq!(message, "host fault");
    }

    #[test]
    fn panic_message_formats() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "host binding panicked");
    }
}
