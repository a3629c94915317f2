//! The parser proper.

use lam_ir::{BinaryOp, LetBinding, Name, Node, NodeRef, ASSIGN_PRECEDENCE};
use lam_lexer::{Keyword, Punct, Token, TokenKind};
use lam_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{ParseError, ParseErrorKind};

/// Cursor over a token list.
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Returned by `peek` once the list is exhausted.
    eof: Token,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
        let end = tokens.last().map_or(0, |t| t.end);
        Parser {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::Eof,
                start: end,
                end,
                line,
                column,
            },
        }
    }

    /// `expr (; expr)*` until end of input.
    pub fn parse_program(&mut self) -> Result<NodeRef, ParseError> {
        let mut seq = Vec::new();
        while !self.at_eof() {
            seq.push(self.parse_expression()?);
            if !self.at_eof() {
                self.expect_punct(Punct::Semi)?;
            }
        }
        Ok(Node::seq(seq))
    }

    // Cursor

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn is_punct(&self, punct: Punct) -> bool {
        self.peek().kind == TokenKind::Punct(punct)
    }

    fn is_keyword(&self, keyword: Keyword) -> bool {
        self.peek().kind == TokenKind::Keyword(keyword)
    }

    fn is_operator(&self, op: &str) -> bool {
        matches!(self.peek().kind, TokenKind::Operator(found) if found == op)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let token = self.peek();
        ParseError {
            kind,
            line: token.line,
            column: token.column,
        }
    }

    fn found(&self) -> String {
        self.peek().kind.to_string()
    }

    fn expect_punct(&mut self, punct: Punct) -> Result<(), ParseError> {
        if self.is_punct(punct) {
            self.advance();
            return Ok(());
        }
        Err(self.error(ParseErrorKind::ExpectedPunctuation {
            expected: punct.as_char(),
            found: self.found(),
        }))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.is_keyword(keyword) {
            self.advance();
            return Ok(());
        }
        Err(self.error(ParseErrorKind::ExpectedKeyword {
            expected: keyword.as_str(),
            found: self.found(),
        }))
    }

    /// `open item (sep item)* sep? close`, possibly empty.
    fn delimited<T>(
        &mut self,
        open: Punct,
        close: Punct,
        sep: Punct,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        self.expect_punct(open)?;
        let mut items = Vec::new();
        let mut first = true;
        while !self.at_eof() {
            if self.is_punct(close) {
                break;
            }
            if first {
                first = false;
            } else {
                self.expect_punct(sep)?;
            }
            if self.is_punct(close) {
                break;
            }
            items.push(item(self)?);
        }
        self.expect_punct(close)?;
        Ok(items)
    }

    // Grammar

    fn parse_expression(&mut self) -> Result<NodeRef, ParseError> {
        ensure_sufficient_stack(|| {
            let atom = self.parse_atom()?;
            let expr = self.parse_binary(atom, 0)?;
            self.parse_calls(expr)
        })
    }

    /// Precedence climbing: fold operators binding tighter than `min_prec` into `left`.
    fn parse_binary(&mut self, left: NodeRef, min_prec: u8) -> Result<NodeRef, ParseError> {
        let mut left = left;
        loop {
            let TokenKind::Operator(symbol) = self.peek().kind else {
                return Ok(left);
            };
            let prec = if symbol == "=" {
                ASSIGN_PRECEDENCE
            } else if let Some(op) = BinaryOp::from_symbol(symbol) {
                op.precedence()
            } else {
                return Ok(left);
            };
            if prec <= min_prec {
                return Ok(left);
            }
            self.advance();
            let atom = self.parse_atom()?;
            let right = ensure_sufficient_stack(|| self.parse_binary(atom, prec))?;
            left = if symbol == "=" {
                Node::assign(left, right)
            } else {
                Node::binary(symbol, left, right)
            };
        }
    }

    /// Any number of trailing argument lists: `f(1)(2)`.
    fn parse_calls(&mut self, mut func: NodeRef) -> Result<NodeRef, ParseError> {
        while self.is_punct(Punct::LParen) {
            let args = self.delimited(Punct::LParen, Punct::RParen, Punct::Comma, |p| {
                p.parse_expression()
            })?;
            func = Node::call(func, args);
        }
        Ok(func)
    }

    fn parse_atom(&mut self) -> Result<NodeRef, ParseError> {
        let atom = self.parse_atom_inner()?;
        self.parse_calls(atom)
    }

    fn parse_atom_inner(&mut self) -> Result<NodeRef, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_punct(Punct::RParen)?;
                Ok(expr)
            }
            TokenKind::Punct(Punct::LBrace) => self.parse_block(),
            TokenKind::Operator("!") => {
                self.advance();
                Ok(Node::not(self.parse_expression()?))
            }
            TokenKind::Keyword(Keyword::Let) => self.parse_let(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Node::boolean(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Node::boolean(false))
            }
            TokenKind::Keyword(Keyword::Lambda) => {
                self.advance();
                self.parse_lambda()
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Node::var(name))
            }
            TokenKind::Int(value) => {
                self.advance();
                Ok(Node::int(value))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(std::rc::Rc::new(Node::Str(value)))
            }
            _ => Err(self.error(ParseErrorKind::UnexpectedToken {
                found: self.found(),
            })),
        }
    }

    /// `{}` is `false`, `{ e }` is `e`, anything longer a sequence.
    fn parse_block(&mut self) -> Result<NodeRef, ParseError> {
        let mut seq = self.delimited(Punct::LBrace, Punct::RBrace, Punct::Semi, |p| {
            p.parse_expression()
        })?;
        Ok(match seq.len() {
            0 => Node::boolean(false),
            1 => seq.remove(0),
            _ => Node::seq(seq),
        })
    }

    fn parse_if(&mut self) -> Result<NodeRef, ParseError> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.parse_expression()?;
        if !self.is_punct(Punct::LBrace) {
            self.expect_keyword(Keyword::Then)?;
        }
        let consequent = self.parse_expression()?;
        let alternative = if self.is_keyword(Keyword::Else) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Node::cond(condition, consequent, alternative))
    }

    /// After the `lambda` keyword: `name? (params) body`.
    fn parse_lambda(&mut self) -> Result<NodeRef, ParseError> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let vars = self.delimited(Punct::LParen, Punct::RParen, Punct::Comma, |p| {
            p.parse_variable_name()
        })?;
        let body = self.parse_expression()?;
        Ok(Node::lambda(name, vars, body))
    }

    /// `let (bindings) body`, or the named form `let name (bindings) body`
    /// which becomes an immediately applied named function.
    fn parse_let(&mut self) -> Result<NodeRef, ParseError> {
        self.expect_keyword(Keyword::Let)?;
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            let bindings = self.parse_bindings()?;
            let body = self.parse_expression()?;
            trace!(name = %name, arity = bindings.len(), "desugaring named let");
            let (vars, args): (Vec<Name>, Vec<NodeRef>) = bindings
                .into_iter()
                .map(|b| (b.name, b.def.unwrap_or_else(|| Node::boolean(false))))
                .unzip();
            return Ok(Node::call(Node::lambda(Some(name), vars, body), args));
        }
        let vars = self.parse_bindings()?;
        let body = self.parse_expression()?;
        Ok(Node::declare(vars, body))
    }

    fn parse_bindings(&mut self) -> Result<Vec<LetBinding>, ParseError> {
        self.delimited(Punct::LParen, Punct::RParen, Punct::Comma, |p| {
            p.parse_binding()
        })
    }

    /// `name` or `name = expr`.
    fn parse_binding(&mut self) -> Result<LetBinding, ParseError> {
        let name = self.parse_variable_name()?;
        if self.is_operator("=") {
            self.advance();
            let def = self.parse_expression()?;
            return Ok(LetBinding::new(name, Some(def)));
        }
        if matches!(self.peek().kind, TokenKind::Operator(_)) {
            return Err(self.error(ParseErrorKind::ExpectedOperator {
                expected: "=",
                found: self.found(),
            }));
        }
        Ok(LetBinding::new(name, None))
    }

    fn parse_variable_name(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(self.error(ParseErrorKind::ExpectedVariableName {
            found: self.found(),
        }))
    }
}
