//! Structural validation.
//!
//! The node enum already forces every variant to carry its fields. What it
//! cannot express is that identifiers are non-empty; trees built outside the
//! parser are checked here before evaluation or transformation.

use std::fmt;

use lam_stack::ensure_sufficient_stack;

use crate::{Name, Node};

/// A node that is structurally invalid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedNode {
    /// Variant of the offending node.
    pub kind: &'static str,
    pub reason: String,
}

impl fmt::Display for MalformedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {} node: {}", self.kind, self.reason)
    }
}

impl std::error::Error for MalformedNode {}

/// Check every node reachable from `node`.
pub fn validate(node: &Node) -> Result<(), MalformedNode> {
    ensure_sufficient_stack(|| match node {
        Node::Integer(_) | Node::Str(_) | Node::Boolean(_) => Ok(()),
        Node::Variable(name) => check_name(node, name, "variable name"),
        Node::Assignment { left, right } => {
            validate(left)?;
            validate(right)
        }
        Node::Binary {
            operator,
            left,
            right,
        } => {
            check_name(node, operator, "operator")?;
            validate(left)?;
            validate(right)
        }
        Node::Negation { body } => validate(body),
        Node::Sequence { seq } => seq.iter().try_for_each(|item| validate(item)),
        Node::Call { func, args } => {
            validate(func)?;
            args.iter().try_for_each(|arg| validate(arg))
        }
        Node::Function(lambda) => {
            if let Some(name) = &lambda.name {
                check_name(node, name, "function name")?;
            }
            for var in &lambda.vars {
                check_name(node, var, "parameter name")?;
            }
            validate(&lambda.body)
        }
        Node::Conditional {
            condition,
            consequent,
            alternative,
        } => {
            validate(condition)?;
            validate(consequent)?;
            alternative.as_ref().map_or(Ok(()), |alt| validate(alt))
        }
        Node::Declaration { vars, body } => {
            for binding in vars.iter() {
                check_name(node, &binding.name, "binding name")?;
                if let Some(def) = &binding.def {
                    validate(def)?;
                }
            }
            validate(body)
        }
    })
}

fn check_name(node: &Node, name: &Name, what: &str) -> Result<(), MalformedNode> {
    if name.is_empty() {
        return Err(MalformedNode {
            kind: node.kind_name(),
            reason: format!("empty {what}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::{LetBinding, Name, Node};

    #[test]
    fn test_parser_shaped_tree_is_valid() {
        let tree = Node::declare(
            vec![LetBinding::new("x", Some(Node::int(1)))],
            Node::binary("+", Node::var("x"), Node::int(2)),
        );
        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn test_empty_parameter_is_rejected() {
        let tree = Node::lambda(None, vec![Name::new("")], Node::int(1));
        let err = validate(&tree).unwrap_err();
        assert_eq!(err.kind, "function");
        assert_eq!(err.reason, "empty parameter name");
    }

    #[test]
    fn test_nested_empty_variable_is_rejected() {
        let tree = Node::seq(vec![Node::int(1), Node::not(Node::var(""))]);
        assert_eq!(validate(&tree).unwrap_err().kind, "variable");
    }

    #[test]
    fn test_binding_names_and_definitions_are_checked() {
        let empty_name = Node::declare(
            vec![
                LetBinding::new("x", None),
                LetBinding::new("", Some(Node::int(1))),
            ],
            Node::var("x"),
        );
        let err = validate(&empty_name).unwrap_err();
        assert_eq!(err.kind, "let");
        assert_eq!(err.reason, "empty binding name");

        let bad_def = Node::declare(
            vec![LetBinding::new("x", Some(Node::var("")))],
            Node::var("x"),
        );
        assert_eq!(validate(&bad_def).unwrap_err().kind, "variable");
    }
}
