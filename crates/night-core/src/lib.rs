//! Night Core
//!
//! Types shared by every phase of the Night pipeline.
//!
//! ## Modules
//!
//! - [`span`]: Source locations attached to tokens, nodes and diagnostics
//! - [`value_type`]: The checker's structural type descriptors
//! - [`diagnostics`]: The warning / minor / fatal diagnostic sink
//! - [`error`]: Error enums for parsing, compilation, encoding and execution

pub mod diagnostics;
pub mod error;
pub mod span;
pub mod value_type;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{
    CodegenError, CompilationError, FatalError, NightError, ParseError, ParseErrorKind,
    RuntimeError,
};
pub use span::Span;
pub use value_type::{PrimitiveKind, ValueType, compare_value_t};
