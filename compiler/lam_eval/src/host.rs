//! Host bindings installed in the global frame.

use std::rc::Rc;

use crate::print_handler::SharedPrintHandler;
use crate::value::HostFunction;
use crate::{Environment, EvalResult, Value};

/// Display forms of `args` separated by single spaces.
fn join(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    out
}

/// Define `name` as a host function in `env`.
pub fn define_host(
    env: &Environment,
    name: &str,
    func: impl Fn(&[Value]) -> EvalResult + 'static,
) {
    env.define(
        name.into(),
        Value::Host(Rc::new(HostFunction::new(name, func))),
    );
}

/// Install `print` and `println`. Both return `false`.
pub fn install_prelude(env: &Environment, handler: &SharedPrintHandler) {
    let out = SharedPrintHandler::clone(handler);
    define_host(env, "print", move |args| {
        out.print(&join(args));
        Ok(Value::Bool(false))
    });

    let out = SharedPrintHandler::clone(handler);
    define_host(env, "println", move |args| {
        out.println(&join(args));
        Ok(Value::Bool(false))
    });
}
