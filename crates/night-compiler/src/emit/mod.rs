//! Lowering of checked expression trees to bytecode.
//!
//! The [`BytecodeEmitter`] walks a tree depth-first: operands are emitted
//! before the operator that consumes them, left before right. Literal text
//! is parsed here, at the last moment, into its binary form.
//!
//! Emission has no access to the diagnostic sink. A tree that reaches the
//! emitter is expected to have passed type checking; anything the checker
//! should have caught comes back as a [`CodegenError`].

use night_core::{CodegenError, Span};
use night_parser::{BinaryOp, ExprArena, ExprId, ExprKind, LiteralKind, UnaryOp};

use crate::bytecode::{BytecodeChunk, OpCode};

/// Emits bytecode for expression trees.
pub struct BytecodeEmitter<'a, 'ast> {
    arena: &'a ExprArena<'ast>,
    chunk: BytecodeChunk,
}

impl<'a, 'ast> BytecodeEmitter<'a, 'ast> {
    pub fn new(arena: &'a ExprArena<'ast>) -> Self {
        Self {
            arena,
            chunk: BytecodeChunk::new(),
        }
    }

    /// Append the code for the subtree rooted at `id`.
    pub fn emit_expr(&mut self, id: ExprId) -> Result<(), CodegenError> {
        let node = *self.arena.get(id);
        let line = node.span.line;
        match node.kind {
            ExprKind::Unary { op, operand } => {
                let operand = operand.ok_or(CodegenError::IncompleteExpression { span: node.span })?;
                self.emit_expr(operand)?;
                self.chunk.write_op(unary_opcode(op), line);
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                    return Err(CodegenError::IncompleteExpression { span: node.span });
                };
                self.emit_expr(lhs)?;
                self.emit_expr(rhs)?;
                self.chunk.write_op(binary_opcode(op), line);
            }
            ExprKind::Array { elements } => {
                let count = u8::try_from(elements.len()).map_err(|_| CodegenError::ArrayTooLarge {
                    len: elements.len(),
                    span: node.span,
                })?;
                // Last element first, so the first element ends up on top.
                for &element in elements.iter().rev() {
                    self.emit_expr(element)?;
                }
                self.chunk.write_op(OpCode::Arr, line);
                self.chunk.write_byte(count, line);
            }
            ExprKind::Variable { name, id } => {
                let id = id.ok_or_else(|| CodegenError::UnresolvedVariable {
                    name: name.to_string(),
                    span: node.span,
                })?;
                self.chunk.write_op(OpCode::Load, line);
                self.chunk.write_byte(id, line);
            }
            ExprKind::Value { kind, text } => self.emit_literal(kind, text, node.span)?,
        }
        Ok(())
    }

    fn emit_literal(&mut self, kind: LiteralKind, text: &str, span: Span) -> Result<(), CodegenError> {
        let invalid = || CodegenError::InvalidLiteral {
            text: text.to_string(),
            kind: kind.name(),
            span,
        };
        let line = span.line;
        match kind {
            LiteralKind::Bool => {
                let value = match text {
                    "true" => 1,
                    "false" => 0,
                    _ => return Err(invalid()),
                };
                self.chunk.write_op(OpCode::Bool, line);
                self.chunk.write_byte(value, line);
            }
            LiteralKind::Char => {
                let code: u8 = text.parse().map_err(|_| invalid())?;
                self.chunk.write_op(OpCode::Char1, line);
                self.chunk.write_byte(code, line);
            }
            LiteralKind::Int => {
                // Literals are signed 64-bit at runtime; the sign comes from NEGATIVE.
                let value = text
                    .parse::<i64>()
                    .ok()
                    .and_then(|v| u64::try_from(v).ok())
                    .ok_or_else(invalid)?;
                self.chunk.write_int(value, line);
            }
            LiteralKind::Float => {
                let value: f64 = text.parse().map_err(|_| invalid())?;
                self.chunk.write_float(value, line);
            }
            LiteralKind::Str => self.chunk.write_str(text.as_bytes(), line),
        }
        Ok(())
    }

    /// Finish and return the chunk.
    pub fn finish(self) -> BytecodeChunk {
        self.chunk
    }
}

/// Encode the subtree rooted at `root` into a byte sequence.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn generate_codes(arena: &ExprArena<'_>, root: ExprId) -> Result<Vec<u8>, CodegenError> {
    let mut emitter = BytecodeEmitter::new(arena);
    emitter.emit_expr(root)?;
    let codes = emitter.finish().into_code();
    tracing::debug!(root = %root, bytes = codes.len(), "encoded expression");
    Ok(codes)
}

fn unary_opcode(op: UnaryOp) -> OpCode {
    match op {
        UnaryOp::Negative => OpCode::Negative,
        UnaryOp::Not => OpCode::Not,
    }
}

fn binary_opcode(op: BinaryOp) -> OpCode {
    match op {
        BinaryOp::Add => OpCode::Add,
        BinaryOp::Sub => OpCode::Sub,
        BinaryOp::Mult => OpCode::Mult,
        BinaryOp::Div => OpCode::Div,
        BinaryOp::Lesser => OpCode::Lesser,
        BinaryOp::Greater => OpCode::Greater,
        BinaryOp::LesserEquals => OpCode::LesserEquals,
        BinaryOp::GreaterEquals => OpCode::GreaterEquals,
        BinaryOp::Equals => OpCode::Equals,
        BinaryOp::NotEquals => OpCode::NotEquals,
        BinaryOp::And => OpCode::And,
        BinaryOp::Or => OpCode::Or,
        BinaryOp::Subscript => OpCode::Subscript,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    const S1: u8 = OpCode::SInt1 as u8;

    fn sp() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn string_literal() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let hi = arena.value(LiteralKind::Str, "hi", sp());
        assert_eq!(
            generate_codes(&arena, hi).unwrap(),
            vec![OpCode::Str as u8, S1, 2, b'h', b'i']
        );
    }

    #[test]
    fn int_literals_use_minimal_width() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let cases: [(&str, Vec<u8>); 3] = [
            ("0", vec![S1, 0]),
            ("255", vec![S1, 0xFF]),
            ("256", vec![OpCode::SInt2 as u8, 0x00, 0x01]),
        ];
        for (text, expected) in cases {
            let id = arena.value(LiteralKind::Int, text, sp());
            assert_eq!(generate_codes(&arena, id).unwrap(), expected);
        }
    }

    #[test]
    fn int_literals_stop_at_i64_max() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let max = arena.value(LiteralKind::Int, "9223372036854775807", sp());
        let mut expected = vec![OpCode::SInt8 as u8];
        expected.extend_from_slice(&i64::MAX.to_le_bytes());
        assert_eq!(generate_codes(&arena, max).unwrap(), expected);

        for text in ["9223372036854775808", "18446744073709551615", "-3"] {
            let id = arena.value(LiteralKind::Int, text, sp());
            assert!(matches!(
                generate_codes(&arena, id),
                Err(CodegenError::InvalidLiteral { kind: "int", .. })
            ));
        }
    }

    #[test]
    fn scalar_literals() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let t = arena.value(LiteralKind::Bool, "true", sp());
        let f = arena.value(LiteralKind::Bool, "false", sp());
        let code = arena.value(LiteralKind::Char, "10", sp());
        let seven = arena.value(LiteralKind::Char, "55", sp());
        assert_eq!(generate_codes(&arena, t).unwrap(), vec![OpCode::Bool as u8, 1]);
        assert_eq!(generate_codes(&arena, f).unwrap(), vec![OpCode::Bool as u8, 0]);
        assert_eq!(generate_codes(&arena, code).unwrap(), vec![OpCode::Char1 as u8, 10]);
        assert_eq!(generate_codes(&arena, seven).unwrap(), vec![OpCode::Char1 as u8, b'7']);
    }

    #[test]
    fn float_literal() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let id = arena.value(LiteralKind::Float, "2.5", sp());
        let codes = generate_codes(&arena, id).unwrap();
        assert_eq!(codes[0], OpCode::Float8 as u8);
        assert_eq!(&codes[1..], &2.5f64.to_le_bytes());
    }

    #[test]
    fn operands_before_operator() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let one = arena.value(LiteralKind::Int, "1", sp());
        let two = arena.value(LiteralKind::Int, "2", sp());
        let sub = arena.binary(BinaryOp::Sub, Some(one), Some(two), sp());
        let neg = arena.unary(UnaryOp::Negative, sp());
        let mut root = Some(neg);
        arena.insert(&mut root, sub).unwrap();
        assert_eq!(
            generate_codes(&arena, neg).unwrap(),
            vec![S1, 1, S1, 2, OpCode::Sub as u8, OpCode::Negative as u8]
        );
    }

    #[test]
    fn array_elements_are_reversed() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let one = arena.value(LiteralKind::Int, "1", sp());
        let two = arena.value(LiteralKind::Int, "2", sp());
        let arr = arena.array(&[one, two], sp());
        assert_eq!(
            generate_codes(&arena, arr).unwrap(),
            vec![S1, 2, S1, 1, OpCode::Arr as u8, 2]
        );
    }

    #[test]
    fn variables_load_their_id() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let x = arena.variable("x", sp());
        arena.bind_variable(x, 4);
        assert_eq!(
            generate_codes(&arena, x).unwrap(),
            vec![OpCode::Load as u8, 4]
        );
    }

    #[test]
    fn unresolved_variable() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let x = arena.variable("x", sp());
        assert!(matches!(
            generate_codes(&arena, x),
            Err(CodegenError::UnresolvedVariable { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn contract_violations() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let add = arena.binary(BinaryOp::Add, None, None, sp());
        assert!(matches!(
            generate_codes(&arena, add),
            Err(CodegenError::IncompleteExpression { .. })
        ));

        let bad = arena.value(LiteralKind::Bool, "yes", sp());
        assert!(matches!(
            generate_codes(&arena, bad),
            Err(CodegenError::InvalidLiteral { kind: "bool", .. })
        ));

        for text in ["a", "256", "-1"] {
            let id = arena.value(LiteralKind::Char, text, sp());
            assert!(matches!(
                generate_codes(&arena, id),
                Err(CodegenError::InvalidLiteral { kind: "char", .. })
            ));
        }

        let one = arena.value(LiteralKind::Int, "1", sp());
        let elements = vec![one; 256];
        let big = arena.array(&elements, sp());
        assert!(matches!(
            generate_codes(&arena, big),
            Err(CodegenError::ArrayTooLarge { len: 256, .. })
        ));
    }
}
