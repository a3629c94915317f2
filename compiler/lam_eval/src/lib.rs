//! Lam Eval - trampolined continuation-passing evaluator.
//!
//! # Architecture
//!
//! - [`Environment`]: chain of shared frames for lexical scope and closures
//! - [`evaluate_binary`] / [`apply_operator`]: operator semantics
//! - [`Machine`]: the evaluator proper. Every step hands its value to a
//!   [`Continuation`]; a depth guard parks the next step and unwinds to a
//!   driver loop once the native stack is `max_depth` steps deep, or sooner
//!   if the stack itself runs low.
//! - [`Interpreter`] / [`InterpreterBuilder`]: global frame, host bindings,
//!   print handler and depth configuration
//!
//! Recursion is the only way to loop, so a program's recursion depth is
//! unbounded; the trampoline keeps native stack use bounded regardless.

mod environment;
pub mod errors;
mod exec;
mod host;
mod interpreter;
mod machine;
mod operators;
mod print_handler;
mod value;

pub use environment::{Environment, LocalScope, Scope};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use exec::Arguments;
pub use host::{define_host, install_prelude};
pub use interpreter::{max_depth_from_env, Interpreter, InterpreterBuilder, MAX_DEPTH_VAR};
pub use machine::{
    continuation, evaluate, CallConvention, Continuation, Machine, DEFAULT_MAX_DEPTH,
};
pub use operators::{apply_operator, evaluate_binary};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use value::{Closure, HostFn, HostFunction, Value};

#[cfg(test)]
mod tests;
