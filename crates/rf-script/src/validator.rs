//! Parse-only structural validation.

use rhai::AST;
use thiserror::Error;
use tracing::debug;

use crate::namespace::Namespace;

/// The program text failed to parse. Carries the parser's reason, which is
/// for logs only; the reported outcome uses a fixed message.
#[derive(Debug, Error)]
#[error("invalid syntax: {reason}")]
pub struct InvalidSyntax {
    pub reason: String,
}

/// A syntax tree that passed validation. Only [`validate`] produces one,
/// and it is the only thing the runner accepts.
#[derive(Debug, Clone)]
pub struct ValidatedProgram {
    ast: AST,
}

impl ValidatedProgram {
    pub(crate) fn ast(&self) -> &AST {
        &self.ast
    }
}

/// Parse `text` into a syntax tree using `namespace`'s grammar.
///
/// Never evaluates anything. Hostile but well-formed programs (infinite
/// loops, huge allocations, references to missing names) pass.
pub fn validate(namespace: &Namespace, text: &str) -> Result<ValidatedProgram, InvalidSyntax> {
    match namespace.engine().compile(text) {
        Ok(ast) => {
            debug!(bytes = text.len(), "program text parsed");
            Ok(ValidatedProgram { ast })
        }
        Err(err) => {
            debug!(error = %err, "program text rejected");
            Err(InvalidSyntax {
                reason: err.to_string(),
            })
        }
    }
}
