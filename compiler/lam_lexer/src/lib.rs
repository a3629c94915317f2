//! Lexer for lam using logos.
//!
//! Produces a flat token list ending in [`TokenKind::Eof`]. Every token knows
//! its byte span and the 1-based line and column where it starts, which is
//! what parse errors report.

use std::fmt;
use std::rc::Rc;

use lam_ir::Name;
use logos::Logos;

mod line_index;

pub use line_index::LineIndex;

/// Raw token from logos (before conversion).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|#[^\n]*)")] // Whitespace and `#` comments
enum RawToken {
    // === Keywords ===
    #[token("let")]
    Let,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("lambda")]
    #[token("λ")]
    Lambda,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // === Operators ===
    #[token("=")]
    Assign,
    #[token("||")]
    Or,
    #[token("&&")]
    And,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,

    // === Literals ===
    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Reserved words.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Let,
    If,
    Then,
    Else,
    Lambda,
    True,
    False,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Let => "let",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::Lambda => "lambda",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }
}

/// Punctuation characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,
}

impl Punct {
    pub const fn as_char(self) -> char {
        match self {
            Punct::LParen => '(',
            Punct::RParen => ')',
            Punct::LBrace => '{',
            Punct::RBrace => '}',
            Punct::Comma => ',',
            Punct::Semi => ';',
        }
    }
}

/// Token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Str(Rc<str>),
    Ident(Name),
    Keyword(Keyword),
    Punct(Punct),
    /// Operator symbol as written (`=`, `&&`, `!`, ...).
    Operator(&'static str),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(value) => write!(f, "integer {value}"),
            TokenKind::Str(value) => write!(f, "string {value:?}"),
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::Keyword(kw) => write!(f, "keyword `{}`", kw.as_str()),
            TokenKind::Punct(p) => write!(f, "`{}`", p.as_char()),
            TokenKind::Operator(op) => write!(f, "operator `{op}`"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

/// Tokenization failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unknown character {found:?} at {line}:{column}")]
    UnknownCharacter { found: String, line: u32, column: u32 },
    #[error("integer literal {literal} out of range at {line}:{column}")]
    IntegerOutOfRange {
        literal: String,
        line: u32,
        column: u32,
    },
}

/// Tokenize `source`.
///
/// Stops at the first character that starts no token.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut raw = RawToken::lexer(source);

    while let Some(result) = raw.next() {
        let span = raw.span();
        let slice = raw.slice();
        let (line, column) = index.line_col(span.start);
        let Ok(token) = result else {
            return Err(LexError::UnknownCharacter {
                found: slice.to_string(),
                line,
                column,
            });
        };
        let kind = convert(token, slice).ok_or_else(|| LexError::IntegerOutOfRange {
            literal: slice.to_string(),
            line,
            column,
        })?;
        tokens.push(Token {
            kind,
            start: span.start,
            end: span.end,
            line,
            column,
        });
    }

    let (line, column) = index.line_col(source.len());
    tokens.push(Token {
        kind: TokenKind::Eof,
        start: source.len(),
        end: source.len(),
        line,
        column,
    });
    Ok(tokens)
}

/// Convert a raw token. `None` only for an integer that does not fit `i64`.
fn convert(raw: RawToken, slice: &str) -> Option<TokenKind> {
    let kind = match raw {
        RawToken::Let => TokenKind::Keyword(Keyword::Let),
        RawToken::If => TokenKind::Keyword(Keyword::If),
        RawToken::Then => TokenKind::Keyword(Keyword::Then),
        RawToken::Else => TokenKind::Keyword(Keyword::Else),
        RawToken::Lambda => TokenKind::Keyword(Keyword::Lambda),
        RawToken::True => TokenKind::Keyword(Keyword::True),
        RawToken::False => TokenKind::Keyword(Keyword::False),

        RawToken::LParen => TokenKind::Punct(Punct::LParen),
        RawToken::RParen => TokenKind::Punct(Punct::RParen),
        RawToken::LBrace => TokenKind::Punct(Punct::LBrace),
        RawToken::RBrace => TokenKind::Punct(Punct::RBrace),
        RawToken::Comma => TokenKind::Punct(Punct::Comma),
        RawToken::Semi => TokenKind::Punct(Punct::Semi),

        RawToken::Assign => TokenKind::Operator("="),
        RawToken::Or => TokenKind::Operator("||"),
        RawToken::And => TokenKind::Operator("&&"),
        RawToken::EqEq => TokenKind::Operator("=="),
        RawToken::NotEq => TokenKind::Operator("!="),
        RawToken::LtEq => TokenKind::Operator("<="),
        RawToken::GtEq => TokenKind::Operator(">="),
        RawToken::Lt => TokenKind::Operator("<"),
        RawToken::Gt => TokenKind::Operator(">"),
        RawToken::Plus => TokenKind::Operator("+"),
        RawToken::Minus => TokenKind::Operator("-"),
        RawToken::Star => TokenKind::Operator("*"),
        RawToken::Slash => TokenKind::Operator("/"),
        RawToken::Percent => TokenKind::Operator("%"),
        RawToken::Bang => TokenKind::Operator("!"),

        RawToken::Int => TokenKind::Int(slice.parse().ok()?),
        RawToken::String => TokenKind::Str(unescape(&slice[1..slice.len() - 1]).into()),
        RawToken::Ident => TokenKind::Ident(Name::new(slice)),
    };
    Some(kind)
}

/// A backslash makes the next character literal.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
