//! Bytecode chunk for a compiled expression.
//!
//! A `BytecodeChunk` holds the encoded bytes of one expression along with
//! the source line of each byte, for debugging.

use super::OpCode;

/// Byte width of the smallest integer literal that holds `value`.
pub fn int_width(value: u64) -> usize {
    if value <= u8::MAX as u64 {
        1
    } else if value <= u16::MAX as u64 {
        2
    } else if value <= u32::MAX as u64 {
        4
    } else {
        8
    }
}

/// Encode a non-negative integer literal: a width tag, then the value in
/// that many little-endian bytes. Zero still produces one payload byte.
pub fn int_to_bytecodes(value: u64) -> Vec<u8> {
    let width = int_width(value);
    let tag = OpCode::int_for_width(width).unwrap_or(OpCode::SInt8);
    let mut out = Vec::with_capacity(width + 1);
    out.push(tag as u8);
    out.extend_from_slice(&value.to_le_bytes()[..width]);
    out
}

/// A chunk of encoded bytecode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BytecodeChunk {
    /// The bytecode instructions.
    code: Vec<u8>,
    /// Line numbers for debugging (parallel to code).
    lines: Vec<u32>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an opcode.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write_byte(op as u8, line);
    }

    /// Write a byte operand.
    pub fn write_byte(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8], line: u32) {
        self.code.extend_from_slice(bytes);
        self.lines.resize(self.code.len(), line);
    }

    /// Write a minimal-width integer literal.
    pub fn write_int(&mut self, value: u64, line: u32) {
        self.write_bytes(&int_to_bytecodes(value), line);
    }

    /// Write a float literal.
    pub fn write_float(&mut self, value: f64, line: u32) {
        self.write_op(OpCode::Float8, line);
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// Write a string literal: opcode, integer length, raw bytes.
    pub fn write_str(&mut self, value: &[u8], line: u32) {
        self.write_op(OpCode::Str, line);
        self.write_int(value.len() as u64, line);
        self.write_bytes(value, line);
    }

    /// Get the bytecode.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Get the line number for a bytecode offset.
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    /// Get the current bytecode length.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Take the encoded bytes, dropping line info.
    pub fn into_code(self) -> Vec<u8> {
        self.code
    }
}
