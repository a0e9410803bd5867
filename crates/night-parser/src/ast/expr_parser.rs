//! Expression parsing by precedence insertion.
//!
//! Tokens are consumed left to right. Every operand or operator becomes a
//! node that is inserted into the tree built so far (see `insert.rs`), so
//! precedence is resolved by the tree shape rather than by recursion depth.
//! Recursion is only used for bracketed sub-expressions: groups, array
//! elements and subscript indices.

use night_core::{ParseError, ParseErrorKind, Span};

use crate::ast::{BinaryOp, ExprArena, ExprId, LiteralKind, UnaryOp};
use crate::token::{Token, TokenKind};

/// Parser over a slice of tokens, building into an [`ExprArena`].
pub struct ExprParser<'a, 'src, 'ast> {
    tokens: &'a [Token<'src>],
    pos: usize,
    arena: &'a mut ExprArena<'ast>,
}

impl<'a, 'src, 'ast> ExprParser<'a, 'src, 'ast> {
    pub fn new(tokens: &'a [Token<'src>], arena: &'a mut ExprArena<'ast>) -> Self {
        Self {
            tokens,
            pos: 0,
            arena,
        }
    }

    /// Parse one complete expression from `tokens`.
    ///
    /// Every token must be consumed; a trailing `Eof` token is allowed.
    pub fn parse(tokens: &'a [Token<'src>], arena: &'a mut ExprArena<'ast>) -> Result<ExprId, ParseError> {
        let mut parser = Self::new(tokens, arena);
        let root = parser.parse_expr()?;
        let trailing = parser.peek();
        if trailing.kind != TokenKind::Eof {
            return Err(ParseError::unexpected_token(trailing.span, trailing.text));
        }
        Ok(root)
    }

    /// Parse an expression up to (not including) a closing delimiter, a
    /// comma or the end of input.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        let mut root: Option<ExprId> = None;
        let mut expect_operand = true;

        loop {
            let token = self.peek();
            if is_closing(token.kind) {
                break;
            }

            if expect_operand {
                expect_operand = self.parse_operand(&mut root, token)?;
            } else {
                expect_operand = self.parse_operator(&mut root, token)?;
            }
        }

        let end = self.peek();
        match root {
            Some(root) if !expect_operand => Ok(root),
            _ if end.kind == TokenKind::Eof => Err(ParseError::unexpected_eof(end.span)),
            _ => Err(ParseError::expected_expression(end.span, end.kind.description())),
        }
    }

    /// Handle a token in operand position. Returns whether an operand is
    /// still expected afterwards.
    fn parse_operand(&mut self, root: &mut Option<ExprId>, token: Token<'src>) -> Result<bool, ParseError> {
        let node = match token.kind {
            TokenKind::Int => self.literal(LiteralKind::Int, token),
            TokenKind::Float => self.literal(LiteralKind::Float, token),
            TokenKind::Char => self.literal(LiteralKind::Char, token),
            TokenKind::Str => self.literal(LiteralKind::Str, token),
            TokenKind::Bool => self.literal(LiteralKind::Bool, token),
            TokenKind::Ident => {
                self.advance();
                self.arena.variable(token.text, token.span)
            }
            TokenKind::Operator => {
                let op = UnaryOp::from_symbol(token.text).ok_or_else(|| {
                    ParseError::expected_expression(token.span, &format!("operator '{}'", token.text))
                })?;
                self.advance();
                let node = self.arena.unary(op, token.span);
                self.arena.insert(root, node)?;
                return Ok(true);
            }
            TokenKind::LParen => {
                self.advance();
                let group = self.parse_expr()?;
                self.expect_closing(TokenKind::RParen, token.span)?;
                self.arena.set_guard(group, true);
                group
            }
            TokenKind::LBracket => self.parse_array(token.span)?,
            _ => {
                return Err(ParseError::expected_expression(
                    token.span,
                    token.kind.description(),
                ));
            }
        };
        self.arena.insert(root, node)?;
        Ok(false)
    }

    /// Handle a token in operator position. Returns whether an operand is
    /// expected afterwards.
    fn parse_operator(&mut self, root: &mut Option<ExprId>, token: Token<'src>) -> Result<bool, ParseError> {
        match token.kind {
            TokenKind::Operator => {
                let op = BinaryOp::from_symbol(token.text)
                    .ok_or_else(|| ParseError::unknown_operator(token.span, token.text))?;
                self.advance();
                let node = self.arena.binary(op, None, None, token.span);
                self.arena.insert(root, node)?;
                Ok(true)
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expr()?;
                let close = self.expect_closing(TokenKind::RBracket, token.span)?;
                let node = self.arena.binary(
                    BinaryOp::Subscript,
                    Some(index),
                    None,
                    token.span.merge(close),
                );
                self.arena.insert(root, node)?;
                Ok(false)
            }
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedOperator,
                token.span,
                format!("expected operator, found {}", token.kind.description()),
            )),
        }
    }

    /// `[a, b, ...]` with the opening bracket at `open`.
    fn parse_array(&mut self, open: Span) -> Result<ExprId, ParseError> {
        self.advance();
        let mut elements = Vec::new();
        if self.peek().kind != TokenKind::RBracket {
            loop {
                elements.push(self.parse_expr()?);
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let close = self.expect_closing(TokenKind::RBracket, open)?;
        Ok(self.arena.array(&elements, open.merge(close)))
    }

    fn literal(&mut self, kind: LiteralKind, token: Token<'src>) -> ExprId {
        self.advance();
        self.arena.value(kind, token.text, token.span)
    }

    fn expect_closing(&mut self, kind: TokenKind, open: Span) -> Result<Span, ParseError> {
        let token = self.peek();
        if token.kind == kind {
            self.advance();
            return Ok(token.span);
        }
        Err(ParseError::new(
            ParseErrorKind::MismatchedDelimiter,
            token.span,
            format!(
                "expected {} to close delimiter opened at {open}, found {}",
                kind.description(),
                token.kind.description()
            ),
        ))
    }

    fn peek(&self) -> Token<'src> {
        match self.tokens.get(self.pos) {
            Some(token) => *token,
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| Span::point(t.span.line, t.span.col + t.span.len))
                    .unwrap_or(Span::point(1, 1));
                Token::eof(end)
            }
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }
}

/// Tokens that end an expression regardless of the caller's terminators.
fn is_closing(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eof | TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma
    )
}
