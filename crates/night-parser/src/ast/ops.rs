//! Operator definitions for Night expressions.
//!
//! Each operator carries a single precedence value. The inserter compares
//! these values directly: a higher number binds tighter and sinks deeper
//! into the tree.

use std::fmt;

/// Precedence bands.
///
/// Unary operators sit just above [`UNARY`](precedence::UNARY), binary
/// operators just above [`BINARY`](precedence::BINARY). Leaves and guarded
/// (parenthesized) subtrees are [`ATOMIC`](precedence::ATOMIC) and are never
/// split by a later insertion.
pub mod precedence {
    pub const SUBSCRIPT: u32 = 0;
    pub const UNARY: u32 = 10;
    pub const BINARY: u32 = 100;
    pub const ATOMIC: u32 = 1000;
}

/// Binary operators.
///
/// Organized by precedence from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical (precedence 101)
    /// `&&`
    And,
    /// `||`
    Or,

    // Comparison (precedence 102)
    /// `<`
    Lesser,
    /// `>`
    Greater,
    /// `<=`
    LesserEquals,
    /// `>=`
    GreaterEquals,
    /// `==`
    Equals,
    /// `!=`
    NotEquals,

    // Additive (precedence 103)
    /// `+`
    Add,
    /// `-`
    Sub,

    // Multiplicative (precedence 104)
    /// `*`
    Mult,
    /// `/`
    Div,

    /// `a[i]` (precedence 105). The index is the left child, the subscripted
    /// operand the right child.
    Subscript,
}

impl BinaryOp {
    /// Get the precedence of this operator.
    pub fn precedence(&self) -> u32 {
        use BinaryOp::*;
        let offset = match self {
            And | Or => 1,
            Lesser | Greater | LesserEquals | GreaterEquals | Equals | NotEquals => 2,
            Add | Sub => 3,
            Mult | Div => 4,
            Subscript => 5,
        };
        precedence::BINARY + offset
    }

    /// Try to convert operator text to a binary operator.
    ///
    /// Subscript has no infix spelling and is never returned.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "<" => BinaryOp::Lesser,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LesserEquals,
            ">=" => BinaryOp::GreaterEquals,
            "==" => BinaryOp::Equals,
            "!=" => BinaryOp::NotEquals,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mult,
            "/" => BinaryOp::Div,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Lesser => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LesserEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mult => "*",
            BinaryOp::Div => "/",
            BinaryOp::Subscript => "[]",
        };
        write!(f, "{}", s)
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Negative,
    /// `!x`
    Not,
}

impl UnaryOp {
    /// Get the precedence of this operator.
    pub fn precedence(&self) -> u32 {
        precedence::UNARY + 1
    }

    /// Try to convert operator text to a unary operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(UnaryOp::Negative),
            "!" => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Negative => "-",
            UnaryOp::Not => "!",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_ordering() {
        assert!(BinaryOp::Mult.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Equals.precedence());
        assert!(BinaryOp::Equals.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::Subscript.precedence() > BinaryOp::Div.precedence());
        assert!(BinaryOp::Or.precedence() > UnaryOp::Not.precedence());
        assert!(precedence::ATOMIC > BinaryOp::Subscript.precedence());
    }

    #[test]
    fn precedence_values() {
        assert_eq!(UnaryOp::Negative.precedence(), 11);
        assert_eq!(BinaryOp::Or.precedence(), 101);
        assert_eq!(BinaryOp::GreaterEquals.precedence(), 102);
        assert_eq!(BinaryOp::Sub.precedence(), 103);
        assert_eq!(BinaryOp::Div.precedence(), 104);
        assert_eq!(BinaryOp::Subscript.precedence(), 105);
    }

    #[test]
    fn symbols_round_trip_through_display() {
        for sym in ["&&", "||", "<", ">", "<=", ">=", "==", "!=", "+", "-", "*", "/"] {
            let op = BinaryOp::from_symbol(sym).unwrap();
            assert_eq!(op.to_string(), sym);
        }
        assert_eq!(BinaryOp::from_symbol("%"), None);
        assert_eq!(BinaryOp::from_symbol("[]"), None);
    }

    #[test]
    fn unary_symbols() {
        assert_eq!(UnaryOp::from_symbol("-"), Some(UnaryOp::Negative));
        assert_eq!(UnaryOp::from_symbol("!"), Some(UnaryOp::Not));
        assert_eq!(UnaryOp::from_symbol("+"), None);
    }
}
