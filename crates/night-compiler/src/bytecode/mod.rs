//! Bytecode representation.
//!
//! ## Modules
//!
//! - `opcode`: the single-byte instruction set
//! - `chunk`: encoded bytes with per-byte line info and the integer literal encoding

mod chunk;
mod opcode;

pub use chunk::{BytecodeChunk, int_to_bytecodes, int_width};
pub use opcode::{OpCode, OperandLayout};
