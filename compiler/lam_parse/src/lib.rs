//! Lam Parse - recursive-descent parser for lam.
//!
//! Turns the token list from `lam_lexer` into a [`lam_ir::Node`] tree. A
//! program is a `;`-separated list of expressions and always parses to a
//! [`Node::Sequence`](lam_ir::Node::Sequence).
//!
//! Binary operators are handled by precedence climbing over
//! [`BinaryOp::precedence`](lam_ir::BinaryOp::precedence); `=` sits below
//! every binary operator and builds an assignment node.

mod error;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;

use lam_ir::NodeRef;

/// Tokenize and parse a whole program.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<NodeRef, ParseError> {
    let tokens = lam_lexer::lex(source)?;
    Parser::new(&tokens).parse_program()
}

#[cfg(test)]
mod tests;
