//! Evaluation errors.
//!
//! `EvalErrorKind` carries the structured data for each failure; the factory
//! functions below are the only way the evaluator builds errors, so every
//! message is produced by the kind's `Display` impl.
//!
//! All errors are fatal to the run in progress. The trampoline drops its
//! pending work and hands the error to the caller.

use std::fmt;

use lam_ir::{MalformedNode, Node};

use crate::Value;

/// Result of an evaluation step. Defaults to producing a [`Value`].
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Environment
    UndefinedVariable { name: String },
    ExpectedVariable { found: String },

    // Application
    CannotEvaluate { value: String },

    // Operators
    NotANumber { value: String },
    ZeroDivision,
    UnknownOperator { operator: String },
    IntegerOverflow { operation: &'static str },

    // Input tree
    MalformedNode(MalformedNode),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::ExpectedVariable { found } => {
                write!(f, "cannot assign to {found}: expected a variable")
            }
            Self::CannotEvaluate { value } => write!(f, "cannot evaluate call of {value}"),
            Self::NotANumber { value } => write!(f, "expected integer in lieu of: {value}"),
            Self::ZeroDivision => write!(f, "cannot evaluate zero-division"),
            Self::UnknownOperator { operator } => write!(f, "unknown operator: {operator}"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),
            Self::MalformedNode(inner) => write!(f, "{inner}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError { kind, message }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<MalformedNode> for EvalError {
    fn from(err: MalformedNode) -> Self {
        EvalError::from_kind(EvalErrorKind::MalformedNode(err))
    }
}

// Environment errors

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

pub fn expected_variable(found: &Node) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ExpectedVariable {
        found: found.to_string(),
    })
}

// Application errors

pub fn cannot_evaluate(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotEvaluate {
        value: value.to_string(),
    })
}

// Operator errors

pub fn not_a_number(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotANumber {
        value: value.to_string(),
    })
}

pub fn zero_division() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ZeroDivision)
}

pub fn unknown_operator(operator: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownOperator {
        operator: operator.to_string(),
    })
}

pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}
