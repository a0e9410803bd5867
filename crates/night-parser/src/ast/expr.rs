//! Expression nodes and the arena that owns them.
//!
//! Nodes never point at each other directly. Children are [`ExprId`]s into
//! the owning [`ExprArena`], which lets the inserter rotate subtrees by
//! handing back a new root id instead of swapping node contents in place.
//! Identifier and literal text is interned in a bump arena so the token
//! source can be dropped once parsing is done.

use std::fmt;

use bumpalo::Bump;
use night_core::{Span, ValueType};

use crate::ast::{BinaryOp, UnaryOp, precedence};

/// Handle to a node in an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The primitive type of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Bool,
    Char,
    Int,
    Float,
    Str,
}

impl LiteralKind {
    /// The value type a literal of this kind checks as.
    pub fn value_type(self) -> ValueType {
        match self {
            LiteralKind::Bool => ValueType::BOOL,
            LiteralKind::Char => ValueType::CHAR,
            LiteralKind::Int => ValueType::INT,
            LiteralKind::Float => ValueType::FLOAT,
            LiteralKind::Str => ValueType::STRING,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LiteralKind::Bool => "bool",
            LiteralKind::Char => "char",
            LiteralKind::Int => "int",
            LiteralKind::Float => "float",
            LiteralKind::Str => "str",
        }
    }
}

/// What a node is. Operator slots start empty and are filled by insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprKind<'ast> {
    /// Prefix operator with at most one operand.
    Unary {
        op: UnaryOp,
        operand: Option<ExprId>,
    },
    /// Binary operator. For [`BinaryOp::Subscript`] `lhs` is the index and
    /// `rhs` the subscripted operand.
    Binary {
        op: BinaryOp,
        lhs: Option<ExprId>,
        rhs: Option<ExprId>,
    },
    /// Array literal.
    Array { elements: &'ast [ExprId] },
    /// Variable reference. `id` is filled in by the type checker.
    Variable { name: &'ast str, id: Option<u8> },
    /// Literal value, kept as source text until encoding.
    Value { kind: LiteralKind, text: &'ast str },
}

/// An expression node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expr<'ast> {
    pub kind: ExprKind<'ast>,
    pub span: Span,
    /// Set on parenthesized subtrees. A guarded node acts as a leaf: later
    /// insertions wrap it but never descend into it.
    pub guard: bool,
}

impl<'ast> Expr<'ast> {
    /// Effective precedence of this node, taking the guard into account.
    pub fn precedence(&self) -> u32 {
        if self.guard {
            return precedence::ATOMIC;
        }
        match self.kind {
            ExprKind::Unary { op, .. } => op.precedence(),
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Array { .. } | ExprKind::Variable { .. } | ExprKind::Value { .. } => {
                precedence::ATOMIC
            }
        }
    }

    /// Check if this node has no child slots.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Array { .. } | ExprKind::Variable { .. } | ExprKind::Value { .. }
        )
    }
}

/// Owner of every node of one or more expression trees.
pub struct ExprArena<'ast> {
    bump: &'ast Bump,
    nodes: Vec<Expr<'ast>>,
}

impl<'ast> ExprArena<'ast> {
    /// Create an empty arena interning text into `bump`.
    pub fn new(bump: &'ast Bump) -> Self {
        Self {
            bump,
            nodes: Vec::new(),
        }
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node.
    ///
    /// Ids are only minted by this arena, so indexing cannot go out of bounds
    /// unless an id from a different arena is used.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr<'ast> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ExprId) -> &mut Expr<'ast> {
        &mut self.nodes[id.index()]
    }

    /// Effective precedence of a node.
    #[inline]
    pub fn precedence(&self, id: ExprId) -> u32 {
        self.get(id).precedence()
    }

    fn push(&mut self, kind: ExprKind<'ast>, span: Span) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(Expr {
            kind,
            span,
            guard: false,
        });
        id
    }

    // =========================================================================
    // Node constructors
    // =========================================================================

    /// A unary operator with an empty operand slot.
    pub fn unary(&mut self, op: UnaryOp, span: Span) -> ExprId {
        self.push(ExprKind::Unary { op, operand: None }, span)
    }

    /// A binary operator. Either slot may start empty.
    pub fn binary(
        &mut self,
        op: BinaryOp,
        lhs: Option<ExprId>,
        rhs: Option<ExprId>,
        span: Span,
    ) -> ExprId {
        self.push(ExprKind::Binary { op, lhs, rhs }, span)
    }

    /// An array literal over already-built elements.
    pub fn array(&mut self, elements: &[ExprId], span: Span) -> ExprId {
        let elements = self.bump.alloc_slice_copy(elements);
        self.push(ExprKind::Array { elements }, span)
    }

    /// A variable reference with no identifier bound yet.
    pub fn variable(&mut self, name: &str, span: Span) -> ExprId {
        let name = self.bump.alloc_str(name);
        self.push(ExprKind::Variable { name, id: None }, span)
    }

    /// A literal value.
    pub fn value(&mut self, kind: LiteralKind, text: &str, span: Span) -> ExprId {
        let text = self.bump.alloc_str(text);
        self.push(ExprKind::Value { kind, text }, span)
    }

    /// Mark a subtree as parenthesized.
    pub fn set_guard(&mut self, id: ExprId, guard: bool) {
        self.get_mut(id).guard = guard;
    }

    /// Bind a variable node to its numeric identifier.
    ///
    /// Does nothing if `id` is not a variable node.
    pub fn bind_variable(&mut self, node: ExprId, var_id: u8) {
        if let ExprKind::Variable { id, .. } = &mut self.get_mut(node).kind {
            *id = Some(var_id);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Child ids of a node in evaluation order, skipping empty slots.
    pub fn children(&self, id: ExprId) -> Vec<ExprId> {
        match self.get(id).kind {
            ExprKind::Unary { operand, .. } => operand.into_iter().collect(),
            ExprKind::Binary { lhs, rhs, .. } => lhs.into_iter().chain(rhs).collect(),
            ExprKind::Array { elements } => elements.to_vec(),
            ExprKind::Variable { .. } | ExprKind::Value { .. } => Vec::new(),
        }
    }

    /// Check that the subtree under `root` is a tree: every node is reached
    /// exactly once and no node is its own ancestor.
    pub fn is_tree(&self, root: ExprId) -> bool {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = seen.get_mut(id.index()) else {
                return false;
            };
            if *slot {
                return false;
            }
            *slot = true;
            stack.extend(self.children(id));
        }
        true
    }

    /// Check that every operator slot under `root` is filled.
    pub fn is_complete(&self, root: ExprId) -> bool {
        match self.get(root).kind {
            ExprKind::Unary { operand, .. } => operand.is_some_and(|o| self.is_complete(o)),
            ExprKind::Binary { lhs, rhs, .. } => match (lhs, rhs) {
                (Some(l), Some(r)) => self.is_complete(l) && self.is_complete(r),
                _ => false,
            },
            ExprKind::Array { elements } => elements.iter().all(|e| self.is_complete(*e)),
            ExprKind::Variable { .. } | ExprKind::Value { .. } => true,
        }
    }

    /// S-expression rendering of a subtree, for logs and tests.
    pub fn display(&self, id: ExprId) -> DisplayExpr<'_, 'ast> {
        DisplayExpr { arena: self, id }
    }
}

impl fmt::Debug for ExprArena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprArena")
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// Renders a subtree as an S-expression: `(+ 1 (* 2 3))`.
///
/// Empty slots print as `_`. Subscripts print the index first, matching the
/// node layout: `a[0]` is `([] 0 a)`.
pub struct DisplayExpr<'a, 'ast> {
    arena: &'a ExprArena<'ast>,
    id: ExprId,
}

impl DisplayExpr<'_, '_> {
    fn child(&self, f: &mut fmt::Formatter<'_>, slot: Option<ExprId>) -> fmt::Result {
        match slot {
            Some(id) => write!(f, "{}", self.arena.display(id)),
            None => write!(f, "_"),
        }
    }
}

impl fmt::Display for DisplayExpr<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arena.get(self.id).kind {
            ExprKind::Unary { op, operand } => {
                write!(f, "({op} ")?;
                self.child(f, operand)?;
                write!(f, ")")
            }
            ExprKind::Binary { op, lhs, rhs } => {
                write!(f, "({op} ")?;
                self.child(f, lhs)?;
                write!(f, " ")?;
                self.child(f, rhs)?;
                write!(f, ")")
            }
            ExprKind::Array { elements } => {
                write!(f, "[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.arena.display(*elem))?;
                }
                write!(f, "]")
            }
            ExprKind::Variable { name, .. } => write!(f, "{name}"),
            ExprKind::Value {
                kind: LiteralKind::Str,
                text,
            } => write!(f, "{text:?}"),
            ExprKind::Value { text, .. } => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn leaves_are_atomic() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let v = arena.value(LiteralKind::Int, "1", sp());
        let x = arena.variable("x", sp());
        let arr = arena.array(&[v], sp());
        for id in [v, x, arr] {
            assert_eq!(arena.precedence(id), precedence::ATOMIC);
            assert!(arena.get(id).is_leaf());
        }
    }

    #[test]
    fn guard_overrides_operator_precedence() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let add = arena.binary(BinaryOp::Add, None, None, sp());
        assert_eq!(arena.precedence(add), 103);
        arena.set_guard(add, true);
        assert_eq!(arena.precedence(add), precedence::ATOMIC);
    }

    #[test]
    fn bind_variable_sets_id() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let x = arena.variable("x", sp());
        arena.bind_variable(x, 7);
        assert_eq!(
            arena.get(x).kind,
            ExprKind::Variable {
                name: "x",
                id: Some(7)
            }
        );
    }

    #[test]
    fn completeness_and_display() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let one = arena.value(LiteralKind::Int, "1", sp());
        let s = arena.value(LiteralKind::Str, "a", sp());
        let add = arena.binary(BinaryOp::Add, Some(one), None, sp());
        assert!(!arena.is_complete(add));
        assert_eq!(arena.display(add).to_string(), "(+ 1 _)");

        let arr = arena.array(&[one, s], sp());
        assert!(arena.is_complete(arr));
        assert_eq!(arena.display(arr).to_string(), "[1, \"a\"]");
    }

    #[test]
    fn shared_child_is_not_a_tree() {
        let bump = Bump::new();
        let mut arena = ExprArena::new(&bump);
        let one = arena.value(LiteralKind::Int, "1", sp());
        let add = arena.binary(BinaryOp::Add, Some(one), Some(one), sp());
        assert!(!arena.is_tree(add));
        let two = arena.value(LiteralKind::Int, "2", sp());
        let ok = arena.binary(BinaryOp::Add, Some(one), Some(two), sp());
        assert!(arena.is_tree(ok));
    }
}
