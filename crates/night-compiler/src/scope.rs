//! Lexical scope used while checking expressions.
//!
//! `ParserScope` maps variable names to the one-byte identifiers the
//! bytecode refers to them by, together with their declared types.
//! Identifiers are handed out sequentially in declaration order.

use night_core::{CompilationError, Span, ValueType};
use rustc_hash::FxHashMap;

/// Information about a declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBinding {
    /// Identifier used by `LOAD`
    pub id: u8,
    /// Declared type
    pub ty: ValueType,
    /// Source location of declaration
    pub span: Span,
}

/// Variables visible to an expression.
#[derive(Debug, Default)]
pub struct ParserScope {
    variables: FxHashMap<String, VarBinding>,
    /// Next identifier to hand out. Wider than `u8` so exhaustion is detectable.
    next_id: u16,
}

impl ParserScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable and return its identifier.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        ty: ValueType,
        span: Span,
    ) -> Result<u8, CompilationError> {
        let name = name.into();
        if let Some(existing) = self.variables.get(&name) {
            return Err(CompilationError::VariableRedeclaration {
                name,
                original_span: existing.span,
                new_span: span,
            });
        }

        let id = u8::try_from(self.next_id)
            .map_err(|_| CompilationError::TooManyVariables {
                name: name.clone(),
                span,
            })?;
        self.next_id += 1;

        tracing::trace!(%name, id, ty = %ty, "declare variable");
        self.variables.insert(name, VarBinding { id, ty, span });
        Ok(id)
    }

    /// Look up a variable by name.
    pub fn get_var(&self, name: &str) -> Option<&VarBinding> {
        self.variables.get(name)
    }

    /// Check if a variable is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all bindings (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarBinding)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut scope = ParserScope::new();
        assert_eq!(scope.declare("a", ValueType::INT, Span::point(1, 1)).unwrap(), 0);
        assert_eq!(scope.declare("b", ValueType::STRING, Span::point(2, 1)).unwrap(), 1);
        assert_eq!(scope.len(), 2);

        let b = scope.get_var("b").unwrap();
        assert_eq!(b.id, 1);
        assert_eq!(b.ty, ValueType::STRING);
    }

    #[test]
    fn unknown_name() {
        let scope = ParserScope::new();
        assert!(scope.get_var("missing").is_none());
        assert!(!scope.contains("missing"));
        assert!(scope.is_empty());
    }

    #[test]
    fn redeclaration_is_an_error() {
        let mut scope = ParserScope::new();
        scope.declare("x", ValueType::INT, Span::point(1, 1)).unwrap();
        let err = scope
            .declare("x", ValueType::CHAR, Span::point(3, 5))
            .unwrap_err();
        assert!(matches!(
            err,
            CompilationError::VariableRedeclaration { ref name, original_span, new_span }
                if name == "x" && original_span == Span::point(1, 1) && new_span == Span::point(3, 5)
        ));
        // The original binding is kept.
        assert_eq!(scope.get_var("x").unwrap().ty, ValueType::INT);
    }

    #[test]
    fn identifiers_run_out_after_256() {
        let mut scope = ParserScope::new();
        for i in 0..256 {
            scope
                .declare(format!("v{i}"), ValueType::INT, Span::point(1, 1))
                .unwrap();
        }
        assert_eq!(scope.get_var("v255").unwrap().id, 255);
        let err = scope
            .declare("one_more", ValueType::INT, Span::point(2, 1))
            .unwrap_err();
        assert!(matches!(err, CompilationError::TooManyVariables { .. }));
    }
}
