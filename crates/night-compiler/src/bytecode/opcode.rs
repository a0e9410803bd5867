//! Bytecode operation codes.
//!
//! This module defines the instruction set shared by the encoder and the
//! interpreter. Each opcode is a single byte, with operands following inline.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Bytecode operation codes.
///
/// The VM is a stack-based machine. Literal opcodes push a value, operator
/// opcodes pop their operands and push the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Push an integer.
    /// Operand: 1 byte
    SInt1 = 0,
    /// Push an integer.
    /// Operand: 2 bytes little-endian
    SInt2,
    /// Push an integer.
    /// Operand: 4 bytes little-endian
    SInt4,
    /// Push an integer.
    /// Operand: 8 bytes little-endian, two's complement
    SInt8,
    /// Push a float.
    /// Operand: 8 bytes IEEE-754 little-endian
    Float8,
    /// Push a character code.
    /// Operand: u8
    Char1,
    /// Push a boolean.
    /// Operand: u8 (0 or 1)
    Bool,
    /// Push a string.
    /// Operand: length as an integer literal (tag + bytes), then raw bytes
    Str,
    /// Pop N values into an array, first element on top.
    /// Operand: u8 count
    Arr,
    /// Push a copy of a variable.
    /// Operand: u8 variable id
    Load,

    // =========================================================================
    // Unary Operators
    // =========================================================================
    Negative,
    Not,

    // =========================================================================
    // Binary Operators
    // =========================================================================
    Add,
    Sub,
    Mult,
    Div,
    Lesser,
    Greater,
    LesserEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
    /// Pop the container, then the index.
    Subscript,

    // =========================================================================
    // Calls
    // =========================================================================
    /// Call a function from the function table.
    /// Operands: u8 function id, u8 argument count
    Call,
}

/// How the bytes following an opcode are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandLayout {
    /// Nothing follows.
    None,
    /// A fixed number of bytes follows.
    Fixed(usize),
    /// An integer literal length, then that many bytes.
    LengthPrefixed,
}

impl OpCode {
    /// Convert from u8, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// The integer literal opcode for a payload of `width` bytes.
    pub fn int_for_width(width: usize) -> Option<Self> {
        match width {
            1 => Some(OpCode::SInt1),
            2 => Some(OpCode::SInt2),
            4 => Some(OpCode::SInt4),
            8 => Some(OpCode::SInt8),
            _ => None,
        }
    }

    /// Get the operand layout for this opcode.
    pub fn operand_layout(&self) -> OperandLayout {
        match self {
            OpCode::SInt1 | OpCode::Char1 | OpCode::Bool | OpCode::Arr | OpCode::Load => {
                OperandLayout::Fixed(1)
            }
            OpCode::SInt2 | OpCode::Call => OperandLayout::Fixed(2),
            OpCode::SInt4 => OperandLayout::Fixed(4),
            OpCode::SInt8 | OpCode::Float8 => OperandLayout::Fixed(8),
            OpCode::Str => OperandLayout::LengthPrefixed,
            OpCode::Negative
            | OpCode::Not
            | OpCode::Add
            | OpCode::Sub
            | OpCode::Mult
            | OpCode::Div
            | OpCode::Lesser
            | OpCode::Greater
            | OpCode::LesserEquals
            | OpCode::GreaterEquals
            | OpCode::Equals
            | OpCode::NotEquals
            | OpCode::And
            | OpCode::Or
            | OpCode::Subscript => OperandLayout::None,
        }
    }

    /// Check if this opcode pushes a literal integer.
    pub fn is_int(&self) -> bool {
        matches!(
            self,
            OpCode::SInt1 | OpCode::SInt2 | OpCode::SInt4 | OpCode::SInt8
        )
    }

    /// Get the name of this opcode for disassembly.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::SInt1 => "S_INT1",
            OpCode::SInt2 => "S_INT2",
            OpCode::SInt4 => "S_INT4",
            OpCode::SInt8 => "S_INT8",
            OpCode::Float8 => "FLOAT8",
            OpCode::Char1 => "CHAR1",
            OpCode::Bool => "BOOL",
            OpCode::Str => "STR",
            OpCode::Arr => "ARR",
            OpCode::Load => "LOAD",
            OpCode::Negative => "NEGATIVE",
            OpCode::Not => "NOT",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mult => "MULT",
            OpCode::Div => "DIV",
            OpCode::Lesser => "LESSER",
            OpCode::Greater => "GREATER",
            OpCode::LesserEquals => "LESSER_EQUALS",
            OpCode::GreaterEquals => "GREATER_EQUALS",
            OpCode::Equals => "EQUALS",
            OpCode::NotEquals => "NOT_EQUALS",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Subscript => "SUBSCRIPT",
            OpCode::Call => "CALL",
        }
    }
}
