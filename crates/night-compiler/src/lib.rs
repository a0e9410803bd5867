//! Night Compiler crate.
//!
//! Turns parsed expression trees into bytecode in two passes:
//!
//! 1. **Type checking**: infers a [`ValueType`] per node, binds variables to
//!    their scope identifiers and records minor errors in [`Diagnostics`].
//! 2. **Encoding**: lowers the checked tree to a compact byte sequence.
//!
//! Encoding only runs when checking reported no minor errors, so a compile
//! with errors still completes and hands back every diagnostic it found.
//!
//! ## Modules
//!
//! - [`bytecode`]: instruction set and byte-level encodings
//! - [`checker`]: the type checker
//! - [`emit`]: the tree-to-bytecode emitter
//! - [`scope`]: variable name to identifier bindings

pub mod bytecode;
pub mod checker;
pub mod emit;
pub mod scope;

pub use bytecode::{BytecodeChunk, OpCode, OperandLayout, int_to_bytecodes};
pub use checker::{TypeChecker, binary_result, type_check};
pub use emit::{BytecodeEmitter, generate_codes};
pub use scope::{ParserScope, VarBinding};

use night_core::{CodegenError, Diagnostics, ValueType};
use night_parser::{ExprArena, ExprId};

/// Settings for a [`Compiler`].
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Record the compiler call site of every diagnostic.
    pub debug_diagnostics: bool,
    /// File or section name prefixed on diagnostic messages.
    pub section: Option<String>,
}

/// Result of compiling one expression.
#[derive(Debug)]
pub struct CompileOutput {
    /// Encoded bytecode. `None` when checking reported errors.
    pub codes: Option<Vec<u8>>,
    /// Everything the checker reported.
    pub diagnostics: Diagnostics,
    /// The inferred type of the whole expression.
    pub ty: Option<ValueType>,
}

impl CompileOutput {
    /// Whether the expression compiled to bytecode.
    pub fn is_success(&self) -> bool {
        self.codes.is_some()
    }
}

/// Entry point tying the checker and encoder together.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// A fresh diagnostic sink configured from the options.
    pub fn diagnostics(&self) -> Diagnostics {
        let diagnostics = Diagnostics::new().with_debug(self.options.debug_diagnostics);
        match &self.options.section {
            Some(section) => diagnostics.with_section(section.clone()),
            None => diagnostics,
        }
    }

    /// Type check and encode the expression rooted at `root`.
    ///
    /// Minor errors are returned inside the output, not as `Err`. An `Err`
    /// means the tree broke the encoder's contract, e.g. a variable that
    /// the scope did not know.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_expr(
        &self,
        arena: &mut ExprArena<'_>,
        root: ExprId,
        scope: &ParserScope,
    ) -> Result<CompileOutput, CodegenError> {
        let mut diagnostics = self.diagnostics();
        let ty = type_check(arena, root, scope, &mut diagnostics);

        if diagnostics.has_minor_errors() {
            tracing::debug!(
                errors = diagnostics.minor_error_count(),
                "type check failed, skipping encoding"
            );
            return Ok(CompileOutput {
                codes: None,
                diagnostics,
                ty,
            });
        }

        let codes = generate_codes(arena, root)?;
        Ok(CompileOutput {
            codes: Some(codes),
            diagnostics,
            ty,
        })
    }
}
