//! Structural type checking of expression trees.
//!
//! The checker walks a tree bottom-up and infers a [`ValueType`] for every
//! node. `None` means "no type": either the subtree already produced a
//! diagnostic or it is structurally incomplete. A `None` from a child is
//! propagated without reporting again, so each problem is reported once.
//!
//! Problems are recorded as minor errors and never stop the walk, so one
//! check reports every independent mismatch in the tree.
//!
//! Variable nodes are bound to their scope identifier as a side effect.

use night_core::{CompilationError, Diagnostics, Span, ValueType, compare_value_t};
use night_parser::{BinaryOp, ExprArena, ExprId, ExprKind};

use crate::scope::ParserScope;

/// Type checker over one [`ExprArena`].
pub struct TypeChecker<'a, 'ast> {
    arena: &'a mut ExprArena<'ast>,
    scope: &'a ParserScope,
    diagnostics: &'a mut Diagnostics,
}

impl<'a, 'ast> TypeChecker<'a, 'ast> {
    pub fn new(
        arena: &'a mut ExprArena<'ast>,
        scope: &'a ParserScope,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            arena,
            scope,
            diagnostics,
        }
    }

    /// Infer the type of the subtree rooted at `id`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check(&mut self, id: ExprId) -> Option<ValueType> {
        let node = *self.arena.get(id);
        let ty = match node.kind {
            ExprKind::Unary { op, operand } => {
                let ty = self.check(operand?)?;
                if ty.is_object() {
                    self.diagnostics.report(&CompilationError::InvalidOperand {
                        op: op.to_string(),
                        found: ty.to_string(),
                        span: node.span,
                    });
                }
                Some(ty)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let (lhs, rhs) = (lhs?, rhs?);
                // Both sides are checked before bailing so each reports its own errors.
                let lhs_ty = self.check(lhs);
                let rhs_ty = self.check(rhs);
                self.check_binary(op, lhs_ty?, rhs_ty?, node.span)
            }
            ExprKind::Array { elements } => self.check_array(elements),
            ExprKind::Variable { name, .. } => match self.scope.get_var(name) {
                Some(binding) => {
                    let (var_id, ty) = (binding.id, binding.ty.clone());
                    self.arena.bind_variable(id, var_id);
                    Some(ty)
                }
                None => {
                    tracing::error!(%name, span = %node.span, "variable missing from scope");
                    None
                }
            },
            ExprKind::Value { kind, .. } => Some(kind.value_type()),
        };
        tracing::trace!(node = %id, ty = ?ty, "checked");
        ty
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        lhs: ValueType,
        rhs: ValueType,
        span: Span,
    ) -> Option<ValueType> {
        if let Some(ty) = binary_result(op, &lhs, &rhs) {
            return Some(ty);
        }
        self.diagnostics.report(&CompilationError::TypeMismatch {
            left: lhs.to_string(),
            right: rhs.to_string(),
            span,
        });
        None
    }

    /// An array literal types as `array_of(first typed element)`, not the bare
    /// element type. Mismatching elements are reported at their own span.
    fn check_array(&mut self, elements: &[ExprId]) -> Option<ValueType> {
        let mut element_ty: Option<ValueType> = None;
        for &element in elements {
            let Some(ty) = self.check(element) else {
                continue;
            };
            match &element_ty {
                None => element_ty = Some(ty),
                Some(first) if !compare_value_t(first, &ty) => {
                    let span = self.arena.get(element).span;
                    self.diagnostics
                        .report(&CompilationError::HeterogeneousArray { span });
                }
                Some(_) => {}
            }
        }
        element_ty.map(ValueType::array_of)
    }
}

/// Result type of a binary operator, or `None` if no rule applies.
///
/// Rules are tried in order and the first match wins. For `SUBSCRIPT`,
/// `lhs` is the index and `rhs` the subscripted operand.
pub fn binary_result(op: BinaryOp, lhs: &ValueType, rhs: &ValueType) -> Option<ValueType> {
    use night_core::PrimitiveKind::*;

    if op == BinaryOp::Add && lhs.is(Int) {
        return Some(ValueType::INT);
    }
    let comparable = compare_value_t(lhs, rhs);
    // A non-int `+` only takes the boolean path when its operands agree.
    if matches!(op, BinaryOp::Equals | BinaryOp::NotEquals | BinaryOp::Or)
        || (op == BinaryOp::Add && comparable)
    {
        return Some(ValueType::BOOL);
    }
    if op == BinaryOp::Subscript && lhs.is(Int) {
        if rhs.is(Str) {
            return Some(ValueType::STRING);
        }
        if let Some(element) = rhs.element() {
            return Some(element.clone());
        }
    }
    if lhs.is(Str) && rhs.is(Str) {
        return Some(ValueType::STRING);
    }
    for kind in [Int, Char, Bool] {
        if lhs.is(kind) && comparable {
            return Some(ValueType::Primitive(kind));
        }
    }
    None
}

/// Check `root` against `scope`, recording problems in `diagnostics`.
pub fn type_check(
    arena: &mut ExprArena<'_>,
    root: ExprId,
    scope: &ParserScope,
    diagnostics: &mut Diagnostics,
) -> Option<ValueType> {
    TypeChecker::new(arena, scope, diagnostics).check(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use night_parser::{LiteralKind, UnaryOp};

    fn sp() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn literals_check_as_their_kind() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        for (kind, expected) in [
            (LiteralKind::Int, ValueType::INT),
            (LiteralKind::Char, ValueType::CHAR),
            (LiteralKind::Str, ValueType::STRING),
            (LiteralKind::Bool, ValueType::BOOL),
            (LiteralKind::Float, ValueType::FLOAT),
        ] {
            let id = arena.value(kind, "0", sp());
            assert_eq!(type_check(&mut arena, id, &scope, &mut diags), Some(expected));
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn binary_rules_in_order() {
        use ValueType as T;
        let ints = T::array_of(T::INT);
        assert_eq!(binary_result(BinaryOp::Add, &T::INT, &T::STRING), Some(T::INT));
        assert_eq!(binary_result(BinaryOp::Add, &T::CHAR, &T::CHAR), Some(T::BOOL));
        assert_eq!(binary_result(BinaryOp::Add, &T::STRING, &T::STRING), Some(T::BOOL));
        assert_eq!(binary_result(BinaryOp::Add, &T::STRING, &T::INT), None);
        assert_eq!(binary_result(BinaryOp::Equals, &T::STRING, &T::INT), Some(T::BOOL));
        assert_eq!(binary_result(BinaryOp::Or, &T::BOOL, &T::BOOL), Some(T::BOOL));
        assert_eq!(binary_result(BinaryOp::Subscript, &T::INT, &T::STRING), Some(T::STRING));
        assert_eq!(binary_result(BinaryOp::Subscript, &T::INT, &ints), Some(T::INT));
        assert_eq!(binary_result(BinaryOp::Sub, &T::STRING, &T::STRING), Some(T::STRING));
        assert_eq!(binary_result(BinaryOp::Mult, &T::INT, &T::INT), Some(T::INT));
        assert_eq!(binary_result(BinaryOp::Lesser, &T::CHAR, &T::CHAR), Some(T::CHAR));
        assert_eq!(binary_result(BinaryOp::And, &T::BOOL, &T::BOOL), Some(T::BOOL));
        assert_eq!(binary_result(BinaryOp::Sub, &T::INT, &T::CHAR), None);
        assert_eq!(binary_result(BinaryOp::Subscript, &T::STRING, &ints), None);
        assert_eq!(binary_result(BinaryOp::Div, &T::FLOAT, &T::FLOAT), None);
    }

    #[test]
    fn string_minus_int_is_a_mismatch() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let x = arena.value(LiteralKind::Str, "x", sp());
        let one = arena.value(LiteralKind::Int, "1", sp());
        let sub = arena.binary(BinaryOp::Sub, Some(x), Some(one), Span::point(2, 5));

        assert_eq!(type_check(&mut arena, sub, &scope, &mut diags), None);
        assert_eq!(diags.minor_error_count(), 1);
        let entry = diags.minor_errors().next().unwrap();
        assert_eq!(entry.message, "type mismatch between 'str' and 'int'");
        assert_eq!(entry.span, Span::point(2, 5));
    }

    #[test]
    fn string_plus_int_is_a_mismatch() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let x = arena.value(LiteralKind::Str, "x", sp());
        let one = arena.value(LiteralKind::Int, "1", sp());
        let add = arena.binary(BinaryOp::Add, Some(x), Some(one), sp());
        assert_eq!(type_check(&mut arena, add, &scope, &mut diags), None);
        assert_eq!(
            diags.minor_errors().next().unwrap().message,
            "type mismatch between 'str' and 'int'"
        );
    }

    #[test]
    fn errors_are_not_reported_twice() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let s = arena.value(LiteralKind::Str, "s", sp());
        let one = arena.value(LiteralKind::Int, "1", sp());
        let bad = arena.binary(BinaryOp::Div, Some(s), Some(one), sp());
        let two = arena.value(LiteralKind::Int, "2", sp());
        let outer = arena.binary(BinaryOp::Mult, Some(two), Some(bad), sp());
        assert_eq!(type_check(&mut arena, outer, &scope, &mut diags), None);
        assert_eq!(diags.minor_error_count(), 1);
    }

    #[test]
    fn both_sides_report() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let mut bad = || {
            let s = arena.value(LiteralKind::Str, "s", sp());
            let c = arena.value(LiteralKind::Char, "99", sp());
            arena.binary(BinaryOp::Div, Some(s), Some(c), sp())
        };
        let (l, r) = (bad(), bad());
        let outer = arena.binary(BinaryOp::Sub, Some(l), Some(r), sp());
        assert_eq!(type_check(&mut arena, outer, &scope, &mut diags), None);
        assert_eq!(diags.minor_error_count(), 2);
    }

    #[test]
    fn heterogeneous_array() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let one = arena.value(LiteralKind::Int, "1", sp());
        let a = arena.value(LiteralKind::Str, "a", Span::point(1, 5));
        let arr = arena.array(&[one, a], sp());

        let ty = type_check(&mut arena, arr, &scope, &mut diags);
        assert_eq!(ty, Some(ValueType::array_of(ValueType::INT)));
        assert_eq!(diags.minor_error_count(), 1);
        let entry = diags.minor_errors().next().unwrap();
        assert_eq!(entry.message, "all values of an array must be the same");
        assert_eq!(entry.span, Span::point(1, 5));
    }

    #[test]
    fn array_type_comes_from_first_typed_element() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let s = arena.value(LiteralKind::Str, "s", sp());
        let one = arena.value(LiteralKind::Int, "1", sp());
        let bad = arena.binary(BinaryOp::Div, Some(s), Some(one), sp());
        let c = arena.value(LiteralKind::Char, "99", sp());
        let arr = arena.array(&[bad, c], sp());
        assert_eq!(
            type_check(&mut arena, arr, &scope, &mut diags),
            Some(ValueType::array_of(ValueType::CHAR))
        );
        assert_eq!(diags.minor_error_count(), 1);

        let empty = arena.array(&[], sp());
        assert_eq!(type_check(&mut arena, empty, &scope, &mut diags), None);
    }

    #[test]
    fn not_over_array_is_minor_and_keeps_type() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let one = arena.value(LiteralKind::Int, "1", sp());
        let arr = arena.array(&[one], sp());
        let not = arena.unary(UnaryOp::Not, sp());
        let mut root = Some(not);
        arena.insert(&mut root, arr).unwrap();

        let ty = type_check(&mut arena, not, &scope, &mut diags);
        assert_eq!(ty, Some(ValueType::array_of(ValueType::INT)));
        assert_eq!(diags.minor_error_count(), 1);
        assert!(
            diags
                .minor_errors()
                .next()
                .unwrap()
                .message
                .contains("expected primitive type")
        );
    }

    #[test]
    fn negative_over_primitive_is_fine() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let one = arena.value(LiteralKind::Int, "1", sp());
        let neg = arena.unary(UnaryOp::Negative, sp());
        let mut root = Some(neg);
        arena.insert(&mut root, one).unwrap();
        assert_eq!(
            type_check(&mut arena, neg, &scope, &mut diags),
            Some(ValueType::INT)
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn variables_bind_ids() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let mut scope = ParserScope::new();
        scope.declare("pad", ValueType::INT, sp()).unwrap();
        scope
            .declare("xs", ValueType::array_of(ValueType::CHAR), sp())
            .unwrap();
        let mut diags = Diagnostics::new();

        let xs = arena.variable("xs", sp());
        let zero = arena.value(LiteralKind::Int, "0", sp());
        let sub = arena.binary(BinaryOp::Subscript, Some(zero), Some(xs), sp());
        assert_eq!(
            type_check(&mut arena, sub, &scope, &mut diags),
            Some(ValueType::CHAR)
        );
        assert_eq!(
            arena.get(xs).kind,
            ExprKind::Variable {
                name: "xs",
                id: Some(1)
            }
        );
    }

    #[test]
    fn unknown_variable_has_no_type_and_no_diagnostic() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let x = arena.variable("x", sp());
        assert_eq!(type_check(&mut arena, x, &scope, &mut diags), None);
        assert!(diags.is_empty());
    }

    #[test]
    fn incomplete_operator_has_no_type() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let scope = ParserScope::new();
        let mut diags = Diagnostics::new();
        let one = arena.value(LiteralKind::Int, "1", sp());
        let add = arena.binary(BinaryOp::Add, Some(one), None, sp());
        assert_eq!(type_check(&mut arena, add, &scope, &mut diags), None);
        assert!(diags.is_empty());
    }
}
