//! Reading bytecode back: the inverse of the encoder.
//!
//! Integer literals are decoded by width tag and zero-extended, so every
//! unsigned value the encoder writes reads back exactly.

use night_compiler::{OpCode, OperandLayout};
use night_core::RuntimeError;

/// Cursor over a byte sequence.
#[derive(Debug, Clone)]
pub struct BytecodeReader<'c> {
    codes: &'c [u8],
    offset: usize,
}

impl<'c> BytecodeReader<'c> {
    pub fn new(codes: &'c [u8]) -> Self {
        Self { codes, offset: 0 }
    }

    /// Offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.codes.len()
    }

    pub fn read_byte(&mut self) -> Result<u8, RuntimeError> {
        let byte = *self
            .codes
            .get(self.offset)
            .ok_or(RuntimeError::TruncatedBytecode {
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'c [u8], RuntimeError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.codes.len())
            .ok_or(RuntimeError::TruncatedBytecode {
                offset: self.offset,
            })?;
        let bytes = &self.codes[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_op(&mut self) -> Result<OpCode, RuntimeError> {
        let offset = self.offset;
        let byte = self.read_byte()?;
        OpCode::from_u8(byte).ok_or(RuntimeError::UnknownOpcode { byte, offset })
    }

    /// Read the payload of an integer literal whose tag was already read.
    pub fn read_int_payload(&mut self, tag: OpCode) -> Result<u64, RuntimeError> {
        let width = match tag.operand_layout() {
            OperandLayout::Fixed(width) if tag.is_int() => width,
            _ => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "integer literal",
                    actual: tag.name(),
                });
            }
        };
        let mut buf = [0u8; 8];
        buf[..width].copy_from_slice(self.read_bytes(width)?);
        Ok(u64::from_le_bytes(buf))
    }

    /// Read a full integer literal: tag then payload.
    pub fn read_int(&mut self) -> Result<u64, RuntimeError> {
        let tag = self.read_op()?;
        self.read_int_payload(tag)
    }

    pub fn read_f64(&mut self) -> Result<f64, RuntimeError> {
        let bytes = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(buf))
    }

    /// Read the operand of a `STR` instruction: integer length then bytes.
    pub fn read_str(&mut self) -> Result<&'c [u8], RuntimeError> {
        let offset = self.offset;
        let len = usize::try_from(self.read_int()?)
            .map_err(|_| RuntimeError::TruncatedBytecode { offset })?;
        self.read_bytes(len)
    }
}

/// Render bytecode one instruction per line: `offset NAME operands`.
pub fn disassemble(codes: &[u8]) -> Result<String, RuntimeError> {
    let mut reader = BytecodeReader::new(codes);
    let mut out = String::new();
    while !reader.is_at_end() {
        let offset = reader.offset();
        let op = reader.read_op()?;
        let operands = match op {
            op if op.is_int() => reader.read_int_payload(op)?.to_string(),
            OpCode::Float8 => reader.read_f64()?.to_string(),
            OpCode::Str => format!("{:?}", String::from_utf8_lossy(reader.read_str()?)),
            _ => match op.operand_layout() {
                OperandLayout::Fixed(len) => reader
                    .read_bytes(len)?
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
                OperandLayout::None | OperandLayout::LengthPrefixed => String::new(),
            },
        };
        if operands.is_empty() {
            out.push_str(&format!("{offset:04} {}\n", op.name()));
        } else {
            out.push_str(&format!("{offset:04} {} {operands}\n", op.name()));
        }
    }
    Ok(out)
}
