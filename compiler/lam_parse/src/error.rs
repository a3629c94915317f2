//! Parse errors.

use lam_lexer::LexError;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unknown character {0:?}")]
    UnknownCharacter(String),
    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOutOfRange(String),
    #[error("expected punctuation `{expected}`, found {found}")]
    ExpectedPunctuation { expected: char, found: String },
    #[error("expected keyword `{expected}`, found {found}")]
    ExpectedKeyword {
        expected: &'static str,
        found: String,
    },
    #[error("expected operator `{expected}`, found {found}")]
    ExpectedOperator {
        expected: &'static str,
        found: String,
    },
    #[error("expected variable name, found {found}")]
    ExpectedVariableName { found: String },
    #[error("unexpected {found}")]
    UnexpectedToken { found: String },
}

/// A parse error with the position of the offending token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::UnknownCharacter {
                found,
                line,
                column,
            } => ParseError {
                kind: ParseErrorKind::UnknownCharacter(found),
                line,
                column,
            },
            LexError::IntegerOutOfRange {
                literal,
                line,
                column,
            } => ParseError {
                kind: ParseErrorKind::IntegerOutOfRange(literal),
                line,
                column,
            },
        }
    }
}
