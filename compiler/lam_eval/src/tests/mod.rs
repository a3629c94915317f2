//! Evaluator tests, grouped by concern.


use lam_ir::{Node, NodeRef};

use crate::{buffer_handler, EvalResult, Interpreter, InterpreterBuilder, Value};

/// Interpreter with a capturing print handler and a fixed depth threshold,
/// so results do not depend on `LAM_MAX_DEPTH`.
fn interpreter() -> Interpreter {
    InterpreterBuilder::new()
        .print_handler(buffer_handler())
        .max_depth(crate::DEFAULT_MAX_DEPTH)
        .build()
}

fn parse(source: &str) -> NodeRef {
    match lam_parse::parse(source) {
        Ok(node) => node,
        Err(err) => panic!("test program does not parse: {err}"),
    }
}

/// Parse and run `source`.
fn run(source: &str) -> EvalResult {
    interpreter().run(&parse(source))
}

fn run_node(node: &NodeRef) -> EvalResult {
    interpreter().run(node)
}

fn int(n: i64) -> Value {
    Value::Int(n)
}

fn cond(condition: NodeRef, consequent: NodeRef, alternative: Option<NodeRef>) -> NodeRef {
    Node::cond(condition, consequent, alternative)
}
