//! Interpreter: a global frame plus a configured machine.
//!
//! Build one with [`InterpreterBuilder`]. The global frame persists across
//! runs, so definitions made by one program are visible to the next.

mod builder;

pub use builder::{max_depth_from_env, InterpreterBuilder, MAX_DEPTH_VAR};

use std::rc::Rc;

use lam_ir::{Name, NodeRef};
use tracing::debug_span;

use crate::machine::{CallConvention, Continuation, Machine};
use crate::print_handler::SharedPrintHandler;
use crate::{Environment, EvalResult, Value};

pub struct Interpreter {
    globals: Environment,
    machine: Machine,
    print_handler: SharedPrintHandler,
}

impl Interpreter {
    /// Evaluate `node` in the global frame and return its value.
    pub fn run(&mut self, node: &NodeRef) -> EvalResult {
        let _span = debug_span!("run", kind = node.kind_name()).entered();
        self.machine.run(Rc::clone(node), self.globals.clone())
    }

    /// Evaluate `node` in the global frame, handing its value to `k`.
    pub fn execute(&mut self, node: &NodeRef, k: Continuation) -> EvalResult<()> {
        self.machine
            .execute(Rc::clone(node), self.globals.clone(), k)
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Bind `name` in the global frame.
    pub fn define_global(&self, name: impl Into<Name>, value: Value) {
        self.globals.define(name.into(), value);
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn max_depth(&self) -> usize {
        self.machine.max_depth()
    }

    pub fn convention(&self) -> CallConvention {
        self.machine.convention()
    }

    /// Bounces across every run so far.
    pub fn bounces(&self) -> u64 {
        self.machine.bounces()
    }
}
