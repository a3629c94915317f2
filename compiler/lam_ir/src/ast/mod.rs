//! Node model.
//!
//! One enum covers the whole language. Every variant carries exactly the
//! fields it needs; optional parts (`alternative`, a binding's `def`, a
//! function's `name`) are `Option`s, and their absence means `false`.
//!
//! Child lists are `Rc<[_]>` so an evaluator continuation can hold a list
//! while it steps through it.

mod operators;

use std::rc::Rc;

use crate::Name;

pub use operators::{BinaryOp, ASSIGN_PRECEDENCE};

/// Shared handle to an immutable node.
pub type NodeRef = Rc<Node>;

/// A node of the syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Integer(i64),
    Str(Rc<str>),
    Boolean(bool),
    Variable(Name),
    /// `left = right`. `left` must be a [`Node::Variable`]; the evaluator and
    /// transformer reject anything else.
    Assignment {
        left: NodeRef,
        right: NodeRef,
    },
    /// Operator as written. Resolved against [`BinaryOp`] when applied, so a
    /// tree built by hand can carry a symbol the evaluator rejects.
    Binary {
        operator: Name,
        left: NodeRef,
        right: NodeRef,
    },
    Negation {
        body: NodeRef,
    },
    /// Ordered evaluation; the value is the last element's, `false` when empty.
    Sequence {
        seq: Rc<[NodeRef]>,
    },
    Call {
        func: NodeRef,
        args: Rc<[NodeRef]>,
    },
    Function(Rc<Lambda>),
    Conditional {
        condition: NodeRef,
        consequent: NodeRef,
        alternative: Option<NodeRef>,
    },
    /// Sequential (`let*`) bindings scoped over `body`.
    Declaration {
        vars: Rc<[LetBinding]>,
        body: NodeRef,
    },
}

/// A function literal.
///
/// Shared behind an `Rc` so closures can keep the definition alive without
/// copying the body.
#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    /// Self-reference name visible inside `body`.
    pub name: Option<Name>,
    pub vars: Vec<Name>,
    pub body: NodeRef,
}

/// One binding of a `let`.
#[derive(Clone, Debug, PartialEq)]
pub struct LetBinding {
    pub name: Name,
    pub def: Option<NodeRef>,
}

impl LetBinding {
    pub fn new(name: impl Into<Name>, def: Option<NodeRef>) -> Self {
        LetBinding {
            name: name.into(),
            def,
        }
    }
}

impl Node {
    /// Short lowercase name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Integer(_) => "integer",
            Node::Str(_) => "string",
            Node::Boolean(_) => "boolean",
            Node::Variable(_) => "variable",
            Node::Assignment { .. } => "assignment",
            Node::Binary { .. } => "binary",
            Node::Negation { .. } => "negation",
            Node::Sequence { .. } => "sequence",
            Node::Call { .. } => "call",
            Node::Function(_) => "function",
            Node::Conditional { .. } => "conditional",
            Node::Declaration { .. } => "let",
        }
    }

    /// The variable name if this is a [`Node::Variable`].
    pub fn as_variable(&self) -> Option<&Name> {
        match self {
            Node::Variable(name) => Some(name),
            _ => None,
        }
    }

    // Constructors returning shared handles. The parser, the transformer and
    // tests all build trees through these.

    pub fn int(value: i64) -> NodeRef {
        Rc::new(Node::Integer(value))
    }

    pub fn string(value: &str) -> NodeRef {
        Rc::new(Node::Str(Rc::from(value)))
    }

    pub fn boolean(value: bool) -> NodeRef {
        Rc::new(Node::Boolean(value))
    }

    pub fn var(name: impl Into<Name>) -> NodeRef {
        Rc::new(Node::Variable(name.into()))
    }

    pub fn assign(left: NodeRef, right: NodeRef) -> NodeRef {
        Rc::new(Node::Assignment { left, right })
    }

    pub fn binary(operator: impl Into<Name>, left: NodeRef, right: NodeRef) -> NodeRef {
        Rc::new(Node::Binary {
            operator: operator.into(),
            left,
            right,
        })
    }

    pub fn not(body: NodeRef) -> NodeRef {
        Rc::new(Node::Negation { body })
    }

    pub fn seq(seq: Vec<NodeRef>) -> NodeRef {
        Rc::new(Node::Sequence { seq: seq.into() })
    }

    pub fn call(func: NodeRef, args: Vec<NodeRef>) -> NodeRef {
        Rc::new(Node::Call {
            func,
            args: args.into(),
        })
    }

    pub fn lambda(name: Option<Name>, vars: Vec<Name>, body: NodeRef) -> NodeRef {
        Rc::new(Node::Function(Rc::new(Lambda { name, vars, body })))
    }

    pub fn cond(condition: NodeRef, consequent: NodeRef, alternative: Option<NodeRef>) -> NodeRef {
        Rc::new(Node::Conditional {
            condition,
            consequent,
            alternative,
        })
    }

    pub fn declare(vars: Vec<LetBinding>, body: NodeRef) -> NodeRef {
        Rc::new(Node::Declaration {
            vars: vars.into(),
            body,
        })
    }
}
