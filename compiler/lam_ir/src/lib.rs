//! Lam IR - the syntax tree shared by every stage of the lam toolchain.
//!
//! The parser produces [`Node`] trees, the trampolined evaluator in `lam_eval`
//! interprets them directly, and the CPS transformer in `lam_cps` rewrites them
//! into trees whose control flow is explicit.
//!
//! Trees are immutable and reference counted: continuations in the evaluator
//! and transformer hold on to subtrees after the walk that produced them has
//! returned, so children are [`NodeRef`]s rather than boxes.
//!
//! Besides the node model this crate hosts the small analyses every consumer
//! needs: [`is_pure`], [`validate`], and a surface-syntax printer through
//! `Display`.

mod ast;
mod name;
mod printer;
mod purity;
mod validate;

pub use ast::{BinaryOp, Lambda, LetBinding, Node, NodeRef, ASSIGN_PRECEDENCE};
pub use name::Name;
pub use purity::is_pure;
pub use validate::{validate, MalformedNode};
