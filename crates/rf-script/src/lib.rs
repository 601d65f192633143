//! rf-script: Structural validation and isolated execution of untrusted
//! Rhai programs.
//!
//! A [`Namespace`] is a capability-scoped interpreter: it starts from a raw
//! Rhai engine with no standard library, no module resolution, and no output
//! sink, and only the [`Grant`]s and host bindings placed into it are
//! reachable by name. Program text goes through [`validate`] (parse only,
//! nothing evaluated) and the resulting [`ValidatedProgram`] through [`run`].
//!
//! # Isolation boundary
//!
//! The allow-list governs name resolution and nothing else. A value handed
//! out by a granted function or host binding carries its own methods, and
//! whatever is reachable through that value is reachable by the program.
//! Nothing is checked transitively. Keyword functions that reach back into
//! the interpreter ([`RESERVED_KEYWORDS`], `eval` among them) are disabled
//! in every namespace. Any host binding registered through
//! [`Namespace::bindings_mut`] is trusted with everything it can touch.
//! Resource exhaustion is left to the OS ceilings installed beforehand.

pub mod namespace;
pub mod runner;
pub mod validator;

pub use namespace::{Grant, Namespace, RESERVED_KEYWORDS};
pub use runner::run;
pub use validator::{validate, InvalidSyntax, ValidatedProgram};
