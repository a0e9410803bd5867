//! The stack machine that executes expression bytecode.
//!
//! Every instruction either pushes a value (literals, `LOAD`) or pops its
//! operands and pushes one result. A body leaves exactly one value on the
//! stack, which becomes the result of [`Interpreter::execute`].

use std::cmp::Ordering;
use std::sync::OnceLock;

use night_compiler::OpCode;
use night_core::RuntimeError;

use crate::decode::BytecodeReader;
use crate::scope::{FunctionTable, InterpreterScope};
use crate::value::{NightStr, Value};

/// Maximum nesting of `CALL` instructions.
pub const MAX_CALL_DEPTH: usize = 256;

/// Executes bytecode against a function table.
#[derive(Debug)]
pub struct Interpreter<'f> {
    functions: &'f FunctionTable,
    depth: usize,
}

impl<'f> Interpreter<'f> {
    pub fn new(functions: &'f FunctionTable) -> Self {
        Self {
            functions,
            depth: 0,
        }
    }

    /// Run `codes` with the variables in `scope` and return the result.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn execute(&mut self, codes: &[u8], scope: &InterpreterScope) -> Result<Value, RuntimeError> {
        let mut reader = BytecodeReader::new(codes);
        let mut stack: Vec<Value> = Vec::new();

        while !reader.is_at_end() {
            let offset = reader.offset();
            let op = reader.read_op()?;
            let mut pop = || stack.pop().ok_or(RuntimeError::StackUnderflow { offset });

            let value = match op {
                OpCode::SInt1 | OpCode::SInt2 | OpCode::SInt4 | OpCode::SInt8 => {
                    int_value(reader.read_int_payload(op)?)
                }
                OpCode::Float8 => Value::Float(reader.read_f64()?),
                OpCode::Char1 | OpCode::Bool => Value::Int(reader.read_byte()? as i64),
                OpCode::Str => Value::Str(NightStr::new(reader.read_str()?)?),
                OpCode::Arr => {
                    let count = reader.read_byte()? as usize;
                    let mut items = Vec::with_capacity(count);
                    for _ in 0..count {
                        items.push(pop()?);
                    }
                    Value::Array(items)
                }
                OpCode::Load => {
                    let id = reader.read_byte()?;
                    scope
                        .get(id)
                        .cloned()
                        .ok_or(RuntimeError::UndefinedVariable { id })?
                }
                OpCode::Negative => negate(pop()?)?,
                OpCode::Not => Value::from_bool(!pop()?.is_truthy()),
                OpCode::Subscript => {
                    let container = pop()?;
                    let index = pop()?;
                    subscript(container, &index)?
                }
                OpCode::Call => {
                    let id = reader.read_byte()?;
                    let argc = reader.read_byte()? as usize;
                    if stack.len() < argc {
                        return Err(RuntimeError::StackUnderflow { offset });
                    }
                    let args = stack.split_off(stack.len() - argc);
                    self.call(id, args)?
                }
                _ => {
                    let rhs = pop()?;
                    let lhs = pop()?;
                    binary(op, lhs, rhs)?
                }
            };
            stack.push(value);
        }

        let result = stack.pop().ok_or(RuntimeError::StackUnderflow {
            offset: codes.len(),
        })?;
        if !stack.is_empty() {
            tracing::warn!(leftover = stack.len(), "values left on the stack");
        }
        Ok(result)
    }

    /// Call function `id` with `args` in argument order.
    pub fn call(&mut self, id: u8, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let functions = self.functions;
        let func = functions
            .get(id)
            .ok_or(RuntimeError::UndefinedFunction { id })?;
        if func.param_ids().len() != args.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                id,
                expected: func.param_ids().len(),
                got: args.len(),
            });
        }
        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded {
                limit: MAX_CALL_DEPTH,
            });
        }

        let mut frame = InterpreterScope::new();
        for (&param, arg) in func.param_ids().iter().zip(args) {
            frame.set(param, arg);
        }

        tracing::trace!(id, depth = self.depth, "call");
        self.depth += 1;
        let result = self.execute(func.codes(), &frame);
        self.depth -= 1;
        result
    }
}

impl Interpreter<'static> {
    /// An interpreter over the installed process-wide function table, or
    /// an empty table if none was installed.
    pub fn global() -> Self {
        static EMPTY: OnceLock<FunctionTable> = OnceLock::new();
        let functions = FunctionTable::global().unwrap_or_else(|| EMPTY.get_or_init(FunctionTable::new));
        Self::new(functions)
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Decoded integer literal; values past `i64::MAX` stay unsigned.
fn int_value(raw: u64) -> Value {
    i64::try_from(raw).map_or(Value::UInt(raw), Value::Int)
}

/// Numeric operands after promotion: both integers or both floats.
enum Numbers {
    Int(i64, i64),
    Float(f64, f64),
}

fn numbers(lhs: &Value, rhs: &Value) -> Result<Numbers, RuntimeError> {
    if matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_)) {
        Ok(Numbers::Float(lhs.as_float()?, rhs.as_float()?))
    } else {
        Ok(Numbers::Int(lhs.as_int()?, rhs.as_int()?))
    }
}

fn negate(value: Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Float(v) => Ok(Value::Float(-v)),
        other => Ok(Value::Int(other.as_int()?.wrapping_neg())),
    }
}

fn binary(op: OpCode, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    match op {
        OpCode::Add => match (&lhs, &rhs) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a.concat(b)?)),
            _ => arithmetic(op, &lhs, &rhs),
        },
        OpCode::Sub | OpCode::Mult | OpCode::Div => arithmetic(op, &lhs, &rhs),
        OpCode::Lesser | OpCode::Greater | OpCode::LesserEquals | OpCode::GreaterEquals => {
            let ordering = compare(&lhs, &rhs)?;
            let result = match op {
                OpCode::Lesser => ordering == Ordering::Less,
                OpCode::Greater => ordering == Ordering::Greater,
                OpCode::LesserEquals => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::from_bool(result))
        }
        OpCode::Equals => Ok(Value::from_bool(equals(&lhs, &rhs))),
        OpCode::NotEquals => Ok(Value::from_bool(!equals(&lhs, &rhs))),
        OpCode::And => Ok(Value::from_bool(lhs.is_truthy() && rhs.is_truthy())),
        OpCode::Or => Ok(Value::from_bool(lhs.is_truthy() || rhs.is_truthy())),
        other => Err(RuntimeError::TypeMismatch {
            expected: "binary operator",
            actual: other.name(),
        }),
    }
}

fn arithmetic(op: OpCode, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    Ok(match numbers(lhs, rhs)? {
        Numbers::Int(a, b) => Value::Int(match op {
            OpCode::Add => a.wrapping_add(b),
            OpCode::Sub => a.wrapping_sub(b),
            OpCode::Mult => a.wrapping_mul(b),
            _ => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                a.wrapping_div(b)
            }
        }),
        Numbers::Float(a, b) => Value::Float(match op {
            OpCode::Add => a + b,
            OpCode::Sub => a - b,
            OpCode::Mult => a * b,
            _ => a / b,
        }),
    })
}

fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering, RuntimeError> {
    if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        return Ok(a.as_bytes().cmp(b.as_bytes()));
    }
    match numbers(lhs, rhs)? {
        Numbers::Int(a, b) => Ok(a.cmp(&b)),
        // NaN compares as equal so that every comparison yields a result.
        Numbers::Float(a, b) => Ok(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
    }
}

fn equals(lhs: &Value, rhs: &Value) -> bool {
    if lhs.is_numeric() && rhs.is_numeric() {
        return match numbers(lhs, rhs) {
            Ok(Numbers::Int(a, b)) => a == b,
            Ok(Numbers::Float(a, b)) => a == b,
            Err(_) => false,
        };
    }
    lhs == rhs
}

fn subscript(container: Value, index: &Value) -> Result<Value, RuntimeError> {
    let index = index.as_int()?;
    let position = |len: usize| {
        usize::try_from(index)
            .ok()
            .filter(|at| *at < len)
            .ok_or(RuntimeError::IndexOutOfBounds { index, len })
    };
    match container {
        Value::Str(s) => {
            let at = position(s.len())?;
            Ok(Value::Str(NightStr::new(&s.as_bytes()[at..=at])?))
        }
        Value::Array(mut items) => {
            let at = position(items.len())?;
            Ok(items.swap_remove(at))
        }
        other => Err(RuntimeError::TypeMismatch {
            expected: "str or array",
            actual: other.type_name(),
        }),
    }
}
