//! Debug commands: `parse` and `lex` for inspecting the front end.

use lam_lexer::{lex, TokenKind};

use super::CommandError;

/// Parse `source` and render the tree in surface syntax.
pub fn parse_source(source: &str) -> Result<String, CommandError> {
    Ok(lam_parse::parse(source)?.to_string())
}

/// Tokenize `source`: one `line:column kind` line per token, end of input
/// excluded.
pub fn lex_source(source: &str) -> Result<Vec<String>, CommandError> {
    let tokens = lex(source).map_err(lam_parse::ParseError::from)?;
    Ok(tokens
        .iter()
        .filter(|token| !matches!(token.kind, TokenKind::Eof))
        .map(|token| format!("{}:{} {}", token.line, token.column, token.kind))
        .collect())
}
