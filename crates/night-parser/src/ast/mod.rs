//! Abstract Syntax Tree (AST) for Night expressions.
//!
//! This module provides:
//! - Operator definitions with their precedence bands
//! - Expression nodes stored in an index arena
//! - The precedence-insertion algorithm that shapes the tree
//! - A parser driving insertion from a token stream

pub mod ops;

pub mod expr;
mod expr_parser;
mod insert;

// Re-export error types from core
pub use night_core::{ParseError, ParseErrorKind};

pub use expr::*;
pub use expr_parser::ExprParser;
pub use ops::*;
