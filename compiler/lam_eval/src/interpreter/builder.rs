//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use tracing::warn;

use super::Interpreter;
use crate::host::install_prelude;
use crate::machine::{CallConvention, Machine, DEFAULT_MAX_DEPTH};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::Environment;

/// Environment variable consulted when no maximum depth is set explicitly.
pub const MAX_DEPTH_VAR: &str = "LAM_MAX_DEPTH";

/// Read [`MAX_DEPTH_VAR`]. Unset or unparsable values yield `None`.
pub fn max_depth_from_env() -> Option<usize> {
    let raw = std::env::var(MAX_DEPTH_VAR).ok()?;
    match raw.trim().parse() {
        Ok(depth) => Some(depth),
        Err(_) => {
            warn!(value = %raw, "ignoring invalid LAM_MAX_DEPTH");
            None
        }
    }
}

/// Builder for creating Interpreter instances with various configurations.
///
/// Defaults: depth threshold from [`MAX_DEPTH_VAR`] or 200, stdout printing,
/// `print`/`println` installed, implicit continuations.
pub struct InterpreterBuilder {
    max_depth: Option<usize>,
    print_handler: Option<SharedPrintHandler>,
    prelude: bool,
    env: Option<Environment>,
    convention: CallConvention,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            print_handler: None,
            prelude: true,
            env: None,
            convention: CallConvention::default(),
        }
    }

    /// Guarded calls allowed on the native stack before the machine bounces.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set the print handler used by `print` and `println`.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Whether to install `print` and `println` in the global frame.
    #[must_use]
    pub fn prelude(mut self, enabled: bool) -> Self {
        self.prelude = enabled;
        self
    }

    /// Use `env` as the global frame, keeping whatever it already binds.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Use [`CallConvention::Explicit`] for CPS-transformed trees.
    #[must_use]
    pub fn convention(mut self, convention: CallConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn build(self) -> Interpreter {
        let max_depth = self
            .max_depth
            .or_else(max_depth_from_env)
            .unwrap_or(DEFAULT_MAX_DEPTH);
        let print_handler = self.print_handler.unwrap_or_else(stdout_handler);
        let globals = self.env.unwrap_or_default();
        if self.prelude {
            install_prelude(&globals, &print_handler);
        }

        Interpreter {
            globals,
            machine: Machine::new(max_depth, self.convention),
            print_handler,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
