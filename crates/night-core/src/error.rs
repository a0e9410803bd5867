//! Error types for every phase of the Night pipeline.
//!
//! ## Error Hierarchy
//!
//! ```text
//! NightError (top-level wrapper)
//! ├── ParseError        - Expression construction errors (with ParseErrorKind)
//! ├── CompilationError  - Type checking and scope errors
//! ├── CodegenError      - Encoder contract violations
//! ├── FatalError        - A fatal diagnostic recorded in the sink
//! └── RuntimeError      - Execution faults
//! ```
//!
//! Type errors are normally *not* propagated as `Err` values: the checker
//! records them as minor diagnostics and keeps walking. `CompilationError`
//! is the structured form of such a diagnostic and is what the sink stores.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Unexpected end of input.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// An operator was expected between two operands.
    ExpectedOperator,
    /// Operator text did not name a known operator.
    UnknownOperator,
    /// Mismatched delimiter (parentheses or brackets).
    MismatchedDelimiter,
    /// A node was inserted into a tree it cannot attach to.
    InvalidInsertion,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of input",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedOperator => "expected operator",
            ParseErrorKind::UnknownOperator => "unknown operator",
            ParseErrorKind::MismatchedDelimiter => "mismatched delimiter",
            ParseErrorKind::InvalidInsertion => "invalid insertion",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected token: {token}"),
        )
    }

    /// Create an "unexpected end of input" error.
    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            "unexpected end of input",
        )
    }

    /// Create an "expected expression" error.
    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    /// Create an "unknown operator" error.
    pub fn unknown_operator(span: Span, text: &str) -> Self {
        Self::new(
            ParseErrorKind::UnknownOperator,
            span,
            format!("'{text}' is not an operator"),
        )
    }
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Semantic errors found while checking an expression or building a scope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// Operand types do not fit any rule of a binary operator.
    #[error("type mismatch between '{left}' and '{right}'")]
    TypeMismatch {
        left: String,
        right: String,
        span: Span,
    },

    /// An array literal mixes element types.
    #[error("all values of an array must be the same")]
    HeterogeneousArray { span: Span },

    /// A unary operator was applied to a composite operand.
    #[error("expression under operator {op} has type '{found}', expected primitive type")]
    InvalidOperand {
        op: String,
        found: String,
        span: Span,
    },

    /// A variable was declared twice in the same scope.
    #[error("variable '{name}' redeclared (originally declared at {original_span})")]
    VariableRedeclaration {
        name: String,
        original_span: Span,
        new_span: Span,
    },

    /// Variable identifiers are a single byte in the bytecode.
    #[error("too many variables in scope, '{name}' does not fit in a one-byte identifier")]
    TooManyVariables { name: String, span: Span },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::TypeMismatch { span, .. } => *span,
            CompilationError::HeterogeneousArray { span } => *span,
            CompilationError::InvalidOperand { span, .. } => *span,
            CompilationError::VariableRedeclaration { new_span, .. } => *new_span,
            CompilationError::TooManyVariables { span, .. } => *span,
        }
    }
}

// ============================================================================
// Codegen Errors
// ============================================================================

/// The encoder was handed a tree that upstream phases should have rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    #[error("at {span}: variable '{name}' was never bound to an identifier")]
    UnresolvedVariable { name: String, span: Span },

    #[error("at {span}: operator is missing an operand")]
    IncompleteExpression { span: Span },

    #[error("at {span}: literal '{text}' is not a valid {kind}")]
    InvalidLiteral {
        text: String,
        kind: &'static str,
        span: Span,
    },

    #[error("at {span}: array literal has {len} elements, at most 255 are encodable")]
    ArrayTooLarge { len: usize, span: Span },
}

// ============================================================================
// Fatal Errors
// ============================================================================

/// A fatal diagnostic. Returned by the sink so callers can stop with `?`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct FatalError {
    /// The formatted message, as stored in the sink.
    pub message: String,
    /// Where the fatal condition was detected.
    pub span: Span,
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Faults raised while executing bytecode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("stack underflow at offset {offset}")]
    StackUnderflow { offset: usize },

    #[error("unknown opcode {byte:#04x} at offset {offset}")]
    UnknownOpcode { byte: u8, offset: usize },

    #[error("bytecode ends inside an instruction at offset {offset}")]
    TruncatedBytecode { offset: usize },

    #[error("undefined variable {id}")]
    UndefinedVariable { id: u8 },

    #[error("undefined function {id}")]
    UndefinedFunction { id: u8 },

    #[error("function {id} expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch { id: u8, expected: usize, got: usize },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("call depth exceeded the limit of {limit}")]
    CallDepthExceeded { limit: usize },

    #[error("function table already installed")]
    FunctionTableInstalled,
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Any error the pipeline can produce.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NightError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
