//! Night Parser crate.
//!
//! Builds expression trees from a token stream. Lexing happens upstream;
//! this crate consumes [`Token`]s and threads each one into the tree with a
//! precedence-driven insertion algorithm instead of an operator stack.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use night_core::Span;
//! use night_parser::{ExprArena, ExprParser, Token, TokenKind};
//!
//! let bump = Bump::new();
//! let mut arena = ExprArena::new(&bump);
//! let tokens = [
//!     Token::new(TokenKind::Int, "1", Span::new(1, 1, 1)),
//!     Token::new(TokenKind::Operator, "+", Span::new(1, 3, 1)),
//!     Token::new(TokenKind::Int, "2", Span::new(1, 5, 1)),
//!     Token::new(TokenKind::Operator, "*", Span::new(1, 7, 1)),
//!     Token::new(TokenKind::Int, "3", Span::new(1, 9, 1)),
//! ];
//!
//! let root = ExprParser::parse(&tokens, &mut arena).unwrap();
//! assert_eq!(arena.display(root).to_string(), "(+ 1 (* 2 3))");
//! ```

pub mod ast;
pub mod token;

pub use ast::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, ExprParser, LiteralKind, UnaryOp, precedence,
};
pub use token::{Token, TokenKind};
