//! Night VM crate.
//!
//! Runtime side of the pipeline: the [`Value`] model, per-call variable
//! storage, the function table, a decoder for the bytecode the compiler
//! emits, and the [`Interpreter`] that executes it.
//!
//! # Example
//!
//! ```
//! use night_compiler::{BytecodeChunk, OpCode};
//! use night_vm::{FunctionTable, Interpreter, InterpreterScope, Value};
//!
//! let mut chunk = BytecodeChunk::new();
//! chunk.write_int(2, 1);
//! chunk.write_int(40, 1);
//! chunk.write_op(OpCode::Add, 1);
//!
//! let functions = FunctionTable::new();
//! let result = Interpreter::new(&functions)
//!     .execute(chunk.code(), &InterpreterScope::new())
//!     .unwrap();
//! assert_eq!(result, Value::Int(42));
//! ```

pub mod decode;
pub mod interpreter;
pub mod scope;
pub mod value;

pub use decode::{BytecodeReader, disassemble};
pub use interpreter::{Interpreter, MAX_CALL_DEPTH};
pub use scope::{FunctionTable, InterpreterFunction, InterpreterScope};
pub use value::{NightStr, Value};
