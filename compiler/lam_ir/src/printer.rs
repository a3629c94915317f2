//! Surface-syntax rendering of nodes.
//!
//! Compound expressions are parenthesized so the output never depends on
//! precedence, and parser-built trees print back to text that parses to an
//! equivalent tree. Names minted by the CPS transformer use characters the lexer
//! rejects, so transformed trees print for inspection only.

use std::fmt::{self, Write};

use lam_stack::ensure_sufficient_stack;

use crate::{Lambda, Node, NodeRef};

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    ensure_sufficient_stack(|| match node {
        Node::Integer(value) => write!(f, "{value}"),
        Node::Str(value) => write_string(f, value),
        Node::Boolean(value) => write!(f, "{value}"),
        Node::Variable(name) => write!(f, "{name}"),
        Node::Assignment { left, right } => {
            f.write_char('(')?;
            write_node(f, left)?;
            f.write_str(" = ")?;
            write_node(f, right)?;
            f.write_char(')')
        }
        Node::Binary {
            operator,
            left,
            right,
        } => {
            f.write_char('(')?;
            write_node(f, left)?;
            write!(f, " {operator} ")?;
            write_node(f, right)?;
            f.write_char(')')
        }
        Node::Negation { body } => {
            f.write_str("(!")?;
            write_node(f, body)?;
            f.write_char(')')
        }
        Node::Sequence { seq } => {
            if seq.is_empty() {
                return f.write_str("{}");
            }
            f.write_str("{ ")?;
            write_separated(f, seq, "; ")?;
            f.write_str(" }")
        }
        Node::Call { func, args } => {
            write_node(f, func)?;
            f.write_char('(')?;
            write_separated(f, args, ", ")?;
            f.write_char(')')
        }
        Node::Function(lambda) => write_lambda(f, lambda),
        Node::Conditional {
            condition,
            consequent,
            alternative,
        } => {
            f.write_str("(if ")?;
            write_node(f, condition)?;
            f.write_str(" then ")?;
            write_node(f, consequent)?;
            if let Some(alternative) = alternative {
                f.write_str(" else ")?;
                write_node(f, alternative)?;
            }
            f.write_char(')')
        }
        Node::Declaration { vars, body } => {
            f.write_str("(let (")?;
            for (i, binding) in vars.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", binding.name)?;
                if let Some(def) = &binding.def {
                    f.write_str(" = ")?;
                    write_node(f, def)?;
                }
            }
            f.write_str(") ")?;
            write_node(f, body)?;
            f.write_char(')')
        }
    })
}

fn write_lambda(f: &mut fmt::Formatter<'_>, lambda: &Lambda) -> fmt::Result {
    f.write_str("(lambda ")?;
    if let Some(name) = &lambda.name {
        write!(f, "{name} ")?;
    }
    f.write_char('(')?;
    for (i, var) in lambda.vars.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{var}")?;
    }
    f.write_str(") ")?;
    write_node(f, &lambda.body)?;
    f.write_char(')')
}

fn write_separated(f: &mut fmt::Formatter<'_>, nodes: &[NodeRef], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_node(f, node)?;
    }
    Ok(())
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}
