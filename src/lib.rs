//! Night: an expression compiler and bytecode interpreter.
//!
//! The pipeline runs in four sequential phases, each in its own crate:
//!
//! 1. [`night_parser`]: tokens are threaded into an expression tree by
//!    precedence insertion.
//! 2. [`night_compiler::checker`]: the tree is type checked against a
//!    [`ParserScope`]; problems become minor diagnostics.
//! 3. [`night_compiler::emit`]: the checked tree is encoded as bytecode.
//! 4. [`night_vm`]: the bytecode is executed against an [`InterpreterScope`](night_vm::InterpreterScope).
//!
//! # Example
//!
//! ```
//! use night::prelude::*;
//!
//! let tokens = [
//!     Token::new(TokenKind::Ident, "x", Span::new(1, 1, 1)),
//!     Token::new(TokenKind::Operator, "*", Span::new(1, 3, 1)),
//!     Token::new(TokenKind::Int, "3", Span::new(1, 5, 1)),
//! ];
//!
//! let mut scope = ParserScope::new();
//! let x = scope.declare("x", ValueType::INT, Span::point(1, 1)).unwrap();
//!
//! let output = night::compile(&tokens, &scope, &Compiler::default()).unwrap();
//! let codes = output.codes.expect("no type errors");
//!
//! let mut vars = InterpreterScope::new();
//! vars.set(x, Value::Int(14));
//! let functions = FunctionTable::new();
//! let result = Interpreter::new(&functions).execute(&codes, &vars).unwrap();
//! assert_eq!(result, Value::Int(42));
//! ```

use bumpalo::Bump;
use night_compiler::{CompileOutput, Compiler, ParserScope};
use night_core::NightError;
use night_parser::{ExprArena, ExprParser, Token};

// Re-export main types
pub mod prelude {
    pub use night_compiler::{
        BytecodeChunk, CompileOutput, Compiler, CompilerOptions, OpCode, ParserScope, VarBinding,
    };
    pub use night_core::{
        CodegenError, CompilationError, Diagnostic, DiagnosticKind, Diagnostics, NightError,
        ParseError, ParseErrorKind, RuntimeError, Span, ValueType,
    };
    pub use night_parser::{ExprArena, ExprParser, Token, TokenKind};
    pub use night_vm::{FunctionTable, Interpreter, InterpreterFunction, InterpreterScope, Value};
}

/// Parse, check and encode one expression from a token stream.
///
/// The expression tree lives only for the duration of the call. Parse
/// errors and encoder contract violations are returned as `Err`; type
/// errors are reported through the output's diagnostics.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(
    tokens: &[Token<'_>],
    scope: &ParserScope,
    compiler: &Compiler,
) -> Result<CompileOutput, NightError> {
    let bump = Bump::new();
    let mut arena = ExprArena::new(&bump);
    let root = ExprParser::parse(tokens, &mut arena)?;
    tracing::debug!(nodes = arena.len(), tree = %arena.display(root), "parsed expression");
    Ok(compiler.compile_expr(&mut arena, root, scope)?)
}
