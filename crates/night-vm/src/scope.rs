//! Variable and function storage used during execution.
//!
//! An [`InterpreterScope`] belongs to one call and is dropped when the call
//! returns. The [`FunctionTable`] is built once before execution starts and
//! is read-only afterwards; it can be installed process-wide with
//! [`FunctionTable::install`] or lent to an interpreter directly.

use std::sync::OnceLock;

use night_core::RuntimeError;
use rustc_hash::FxHashMap;

use crate::Value;

/// Variables of one call frame, keyed by their bytecode identifier.
#[derive(Debug, Clone, Default)]
pub struct InterpreterScope {
    vars: FxHashMap<u8, Value>,
}

impl InterpreterScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable.
    pub fn get(&self, id: u8) -> Option<&Value> {
        self.vars.get(&id)
    }

    /// Set a variable, returning the previous value.
    pub fn set(&mut self, id: u8, value: Value) -> Option<Value> {
        self.vars.insert(id, value)
    }

    pub fn remove(&mut self, id: u8) -> Option<Value> {
        self.vars.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// A callable body: parameter identifiers plus bytecode.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterFunction {
    param_ids: Vec<u8>,
    codes: Vec<u8>,
}

impl InterpreterFunction {
    pub fn new(param_ids: Vec<u8>, codes: Vec<u8>) -> Self {
        Self { param_ids, codes }
    }

    /// Identifiers that the arguments are bound to, in argument order.
    pub fn param_ids(&self) -> &[u8] {
        &self.param_ids
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }
}

/// Functions by identifier.
#[derive(Debug, Default)]
pub struct FunctionTable {
    funcs: FxHashMap<u8, InterpreterFunction>,
}

static GLOBAL_FUNCTIONS: OnceLock<FunctionTable> = OnceLock::new();

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, returning any function it replaces.
    pub fn insert(&mut self, id: u8, func: InterpreterFunction) -> Option<InterpreterFunction> {
        self.funcs.insert(id, func)
    }

    pub fn get(&self, id: u8) -> Option<&InterpreterFunction> {
        self.funcs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Make this table the process-wide function table.
    ///
    /// Only the first installation succeeds.
    pub fn install(self) -> Result<&'static FunctionTable, RuntimeError> {
        let mut slot = Some(self);
        let installed = GLOBAL_FUNCTIONS.get_or_init(|| slot.take().unwrap_or_default());
        match slot {
            None => {
                tracing::debug!(functions = installed.len(), "installed function table");
                Ok(installed)
            }
            Some(_) => Err(RuntimeError::FunctionTableInstalled),
        }
    }

    /// The process-wide table, if one was installed.
    pub fn global() -> Option<&'static FunctionTable> {
        GLOBAL_FUNCTIONS.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_set_get() {
        let mut scope = InterpreterScope::new();
        assert!(scope.set(3, Value::Int(1)).is_none());
        assert_eq!(scope.set(3, Value::Int(2)), Some(Value::Int(1)));
        assert_eq!(scope.get(3), Some(&Value::Int(2)));
        assert_eq!(scope.remove(3), Some(Value::Int(2)));
        assert!(scope.is_empty());
    }

    #[test]
    fn function_table_lookup() {
        let mut table = FunctionTable::new();
        table.insert(1, InterpreterFunction::new(vec![0], vec![]));
        assert_eq!(table.get(1).unwrap().param_ids(), &[0]);
        assert!(table.get(2).is_none());
        assert_eq!(table.len(), 1);
    }

    // The only test in this crate touching the global table.
    #[test]
    fn install_once() {
        let mut table = FunctionTable::new();
        table.insert(9, InterpreterFunction::new(vec![], vec![0, 1]));
        let installed = table.install().unwrap();
        assert!(installed.get(9).is_some());
        assert!(FunctionTable::global().is_some());

        let second = FunctionTable::new().install();
        assert_eq!(second.unwrap_err(), RuntimeError::FunctionTableInstalled);
    }
}
