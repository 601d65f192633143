//! The allow-list execution context.

use std::fmt;

use rf_protocol::ExecutionOutcome;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::packages::{
    ArithmeticPackage, BasicArrayPackage, BasicMapPackage, BasicMathPackage, BasicStringPackage,
    LanguageCorePackage, LogicPackage, MoreStringPackage, Package,
};
use rhai::{Engine, OptimizationLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::runner;
use crate::validator::{self, InvalidSyntax, ValidatedProgram};

/// A bundle of pure-computation functions that may be placed into a
/// namespace. None of them reach the filesystem, processes, modules, or the
/// environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Language-level helpers from Rhai's core package.
    Core,
    /// Integer and float helpers (`abs`, `sign`, ...).
    Arithmetic,
    /// Comparison and logic operators across numeric types.
    Logic,
    /// String conversion and manipulation.
    Strings,
    /// Arrays and object maps.
    Collections,
    /// Math functions (`sqrt`, `sin`, `floor`, ...).
    Math,
}

impl Grant {
    pub const ALL: [Grant; 6] = [
        Grant::Core,
        Grant::Arithmetic,
        Grant::Logic,
        Grant::Strings,
        Grant::Collections,
        Grant::Math,
    ];

    fn register(self, engine: &mut Engine) {
        match self {
            Grant::Core => {
                engine.register_global_module(LanguageCorePackage::new().as_shared_module());
            }
            Grant::Arithmetic => {
                engine.register_global_module(ArithmeticPackage::new().as_shared_module());
            }
            Grant::Logic => {
                engine.register_global_module(LogicPackage::new().as_shared_module());
            }
            Grant::Strings => {
                engine.register_global_module(BasicStringPackage::new().as_shared_module());
                engine.register_global_module(MoreStringPackage::new().as_shared_module());
            }
            Grant::Collections => {
                engine.register_global_module(BasicArrayPackage::new().as_shared_module());
                engine.register_global_module(BasicMapPackage::new().as_shared_module());
            }
            Grant::Math => {
                engine.register_global_module(BasicMathPackage::new().as_shared_module());
            }
        }
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grant::Core => "core",
            Grant::Arithmetic => "arithmetic",
            Grant::Logic => "logic",
            Grant::Strings => "strings",
            Grant::Collections => "collections",
            Grant::Math => "math",
        };
        f.write_str(name)
    }
}

/// Keyword functions that reach back into the interpreter. They are
/// reserved in every namespace and no grant brings them back.
pub const RESERVED_KEYWORDS: [&str; 6] =
    ["eval", "Fn", "call", "curry", "is_def_var", "is_def_fn"];

/// Capability-scoped interpreter.
///
/// Built from `Engine::new_raw`: the language's statements and built-in
/// operators remain, nothing else is reachable until granted or bound.
/// [`RESERVED_KEYWORDS`] are disabled, so run-time parsing (`eval`) and
/// function-pointer or scope introspection are unavailable. `import`
/// resolves nothing, and `print`/`debug` go nowhere even when the strings
/// grant provides them. Optimization is off so compiling never evaluates
/// anything.
pub struct Namespace {
    engine: Engine,
    grants: Vec<Grant>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::empty()
    }
}

impl Namespace {
    /// A namespace with nothing in it.
    pub fn empty() -> Self {
        let mut engine = Engine::new_raw();
        engine.set_module_resolver(DummyModuleResolver::new());
        engine.set_optimization_level(OptimizationLevel::None);
        engine.on_print(|_| {});
        engine.on_debug(|_, _, _| {});
        for keyword in RESERVED_KEYWORDS {
            engine.disable_symbol(keyword);
        }
        Self {
            engine,
            grants: Vec::new(),
        }
    }

    /// A namespace holding exactly `grants`.
    pub fn with_grants(grants: &[Grant]) -> Self {
        let mut namespace = Self::empty();
        for &grant in grants {
            namespace.grant(grant);
        }
        namespace
    }

    /// Place a grant into the namespace. Granting twice is a no-op.
    pub fn grant(&mut self, grant: Grant) -> &mut Self {
        if !self.grants.contains(&grant) {
            grant.register(&mut self.engine);
            self.grants.push(grant);
            debug!(%grant, "grant placed into namespace");
        }
        self
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// The engine, for registering explicit host bindings.
    ///
    /// Every function registered here becomes reachable by name from the
    /// program, with whatever authority the function itself holds.
    pub fn bindings_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Parse `text` with this namespace's grammar. Nothing is evaluated.
    pub fn validate(&self, text: &str) -> Result<ValidatedProgram, InvalidSyntax> {
        validator::validate(self, text)
    }

    /// Execute a validated program in a fresh scope.
    pub fn run(&self, program: &ValidatedProgram) -> ExecutionOutcome {
        runner::run(self, program)
    }
}
