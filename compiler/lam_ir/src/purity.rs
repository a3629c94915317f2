//! Side-effect analysis.

use lam_stack::ensure_sufficient_stack;

use crate::Node;

/// Whether evaluating `node` can have no observable effect.
///
/// Only assignments and calls change visible state, so a node is impure when
/// it, or anything it evaluates, is one of those. A function literal is pure
/// whatever its body contains: building a closure runs nothing.
pub fn is_pure(node: &Node) -> bool {
    ensure_sufficient_stack(|| match node {
        Node::Integer(_) | Node::Str(_) | Node::Boolean(_) | Node::Variable(_) => true,
        Node::Function(_) => true,
        Node::Assignment { .. } | Node::Call { .. } => false,
        Node::Binary { left, right, .. } => is_pure(left) && is_pure(right),
        Node::Negation { body } => is_pure(body),
        Node::Sequence { seq } => seq.iter().all(|item| is_pure(item)),
        Node::Conditional {
            condition,
            consequent,
            alternative,
        } => {
            is_pure(condition)
                && is_pure(consequent)
                && alternative.as_ref().map_or(true, |alt| is_pure(alt))
        }
        Node::Declaration { vars, body } => {
            vars.iter()
                .all(|binding| binding.def.as_ref().map_or(true, |def| is_pure(def)))
                && is_pure(body)
        }
    })
}
