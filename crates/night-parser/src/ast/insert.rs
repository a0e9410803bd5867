//! Precedence-driven node insertion.
//!
//! Expressions are built left to right by inserting each new node into the
//! current root. A node either sinks into the rightmost open position of a
//! looser-binding operator or takes the current subtree as its own first
//! open operand and becomes the new root. Equal precedence never sinks, so
//! operators of one band associate to the left.

use night_core::{ParseError, ParseErrorKind};

use crate::ast::{ExprArena, ExprId, ExprKind};

impl<'ast> ExprArena<'ast> {
    /// Insert `node` into the tree rooted at `root`.
    ///
    /// An empty root simply becomes `node`. Otherwise `root` is replaced by
    /// whatever node ends up on top after insertion.
    pub fn insert(&mut self, root: &mut Option<ExprId>, node: ExprId) -> Result<(), ParseError> {
        *root = Some(match *root {
            None => node,
            Some(current) => self.insert_into(current, node)?,
        });
        Ok(())
    }

    /// Insert `node` below `current` and return the id of the new subtree root.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn insert_into(&mut self, current: ExprId, node: ExprId) -> Result<ExprId, ParseError> {
        let incoming = self.precedence(node);
        let own = self.precedence(current);
        let target = *self.get(current);

        if !target.guard {
            match target.kind {
                ExprKind::Unary { op, operand: None } => {
                    self.get_mut(current).kind = ExprKind::Unary {
                        op,
                        operand: Some(node),
                    };
                    return Ok(current);
                }
                ExprKind::Unary {
                    op,
                    operand: Some(child),
                } if incoming > own => {
                    let child = self.insert_into(child, node)?;
                    self.get_mut(current).kind = ExprKind::Unary {
                        op,
                        operand: Some(child),
                    };
                    return Ok(current);
                }
                ExprKind::Binary { op, lhs: None, rhs } => {
                    self.get_mut(current).kind = ExprKind::Binary {
                        op,
                        lhs: Some(node),
                        rhs,
                    };
                    return Ok(current);
                }
                ExprKind::Binary {
                    op,
                    lhs,
                    rhs: None,
                } => {
                    self.get_mut(current).kind = ExprKind::Binary {
                        op,
                        lhs,
                        rhs: Some(node),
                    };
                    return Ok(current);
                }
                ExprKind::Binary {
                    op,
                    lhs,
                    rhs: Some(child),
                } if incoming > own => {
                    let child = self.insert_into(child, node)?;
                    self.get_mut(current).kind = ExprKind::Binary {
                        op,
                        lhs,
                        rhs: Some(child),
                    };
                    return Ok(current);
                }
                _ => {}
            }
        }

        self.adopt(node, current)
    }

    /// Make `child` the first open operand of `parent` and return `parent`.
    fn adopt(&mut self, parent: ExprId, child: ExprId) -> Result<ExprId, ParseError> {
        let outer = *self.get(parent);
        let kind = match outer.kind {
            ExprKind::Unary { op, operand: None } => ExprKind::Unary {
                op,
                operand: Some(child),
            },
            ExprKind::Binary { op, lhs: None, rhs } => ExprKind::Binary {
                op,
                lhs: Some(child),
                rhs,
            },
            ExprKind::Binary {
                op,
                lhs: Some(lhs),
                rhs: None,
            } => ExprKind::Binary {
                op,
                lhs: Some(lhs),
                rhs: Some(child),
            },
            _ => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidInsertion,
                    outer.span,
                    format!(
                        "'{}' has no open operand to take '{}'",
                        self.display(parent),
                        self.display(child)
                    ),
                ));
            }
        };
        tracing::trace!(%parent, %child, "rotate: new subtree root");
        self.get_mut(parent).kind = kind;
        Ok(parent)
    }
}
