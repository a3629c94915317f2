//! Runtime values.
//!
//! Integers, strings, booleans and functions all flow through one channel,
//! so operators test the variant at runtime (see `operators`).

use std::fmt;
use std::rc::Rc;

use lam_ir::{Lambda, Name};

use crate::{Environment, EvalResult};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Str(Rc<str>),
    Bool(bool),
    Closure(Rc<Closure>),
    Host(Rc<HostFunction>),
}

impl Value {
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    /// Only `false` is falsy; `0`, `""` and every function are truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Closure(_) => "function",
            Value::Host(_) => "host function",
        }
    }
}

/// Scalars compare by content, functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => a.same_function(b),
            (Value::Host(a), Value::Host(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Closure(closure) => match &closure.lambda.name {
                Some(name) => write!(f, "<lambda {name}>"),
                None => f.write_str("<lambda>"),
            },
            Value::Host(host) => write!(f, "<host {}>", host.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

/// A function value: a literal bundled with the frame it was created in.
pub struct Closure {
    pub lambda: Rc<Lambda>,
    pub env: Environment,
}

impl Closure {
    /// Same literal closed over the same frame.
    ///
    /// A recursive function looked up through its own name is rebuilt on each
    /// lookup, so identity is defined by parts rather than by allocation.
    pub fn same_function(&self, other: &Closure) -> bool {
        Rc::ptr_eq(&self.lambda, &other.lambda) && self.env.ptr_eq(&other.env)
    }
}

/// Signature of host-provided functions. Receives the call's arguments
/// (without any continuation).
pub type HostFn = dyn Fn(&[Value]) -> EvalResult;

/// A function implemented by the host and installed in the global frame.
pub struct HostFunction {
    pub name: Name,
    pub func: Box<HostFn>,
}

impl HostFunction {
    pub fn new(name: impl Into<Name>, func: impl Fn(&[Value]) -> EvalResult + 'static) -> Self {
        HostFunction {
            name: name.into(),
            func: Box::new(func),
        }
    }
}
