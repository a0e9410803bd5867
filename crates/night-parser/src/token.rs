//! Token types consumed by the expression parser.
//!
//! Lexing is not part of this crate. Whatever produces tokens is expected to
//! strip string quotes, so a `Str` token's text is the string content.

use night_core::Span;
use std::fmt;

/// A token from the source code.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token.
    pub text: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// The end-of-input marker.
    #[inline]
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    /// Check if this token is a literal or identifier, i.e. can start an operand.
    pub fn is_atom(&self) -> bool {
        self.kind.is_literal() || self.kind == TokenKind::Ident
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.text, self.span)
    }
}

/// Token categories understood by the expression parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`
    Int,
    /// Float literal: `3.5`
    Float,
    /// Character literal, as its decimal code: `'7'` has the text `55`
    Char,
    /// String literal, quotes already removed
    Str,
    /// `true` or `false`
    Bool,

    /// Variable name
    Ident,

    /// Any operator symbol: `+`, `==`, `!` ...
    Operator,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Check if this kind is a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Char | TokenKind::Str | TokenKind::Bool
        )
    }

    /// Human-readable description used in error messages.
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Char => "character literal",
            TokenKind::Str => "string literal",
            TokenKind::Bool => "boolean literal",
            TokenKind::Ident => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
