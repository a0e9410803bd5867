//! Runtime value type for the interpreter stack and variable slots.
//!
//! Copying a [`Value`] is a deep copy: strings and arrays are duplicated,
//! so every copy owns its buffer and no two values ever share one.

use std::fmt;

use night_core::RuntimeError;

/// A heap string with a trailing NUL byte.
///
/// The buffer is sized to `len + 1`. The NUL is not part of the contents
/// returned by [`as_bytes`](Self::as_bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NightStr {
    buf: Box<[u8]>,
}

impl NightStr {
    /// Copy `bytes` into a fresh buffer.
    pub fn new(bytes: &[u8]) -> Result<Self, RuntimeError> {
        let size = bytes.len() + 1;
        let mut buf = Vec::new();
        buf.try_reserve_exact(size)
            .map_err(|_| RuntimeError::AllocationFailed { bytes: size })?;
        buf.extend_from_slice(bytes);
        buf.push(0);
        Ok(Self {
            buf: buf.into_boxed_slice(),
        })
    }

    /// Contents without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.buf.len() - 1]
    }

    /// Contents including the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate two strings into a new buffer.
    pub fn concat(&self, other: &NightStr) -> Result<Self, RuntimeError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(self.len() + other.len())
            .map_err(|_| RuntimeError::AllocationFailed {
                bytes: self.len() + other.len(),
            })?;
        bytes.extend_from_slice(self.as_bytes());
        bytes.extend_from_slice(other.as_bytes());
        Self::new(&bytes)
    }
}

impl fmt::Debug for NightStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Display for NightStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// A runtime value.
///
/// Booleans and characters are carried as [`Value::Int`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// 64-bit float
    Float(f64),
    /// Owned string
    Str(NightStr),
    /// Owned array of values
    Array(Vec<Value>),
}

impl Value {
    /// Create a string value.
    pub fn str(s: &str) -> Result<Self, RuntimeError> {
        NightStr::new(s.as_bytes()).map(Value::Str)
    }

    /// Boolean as an integer value.
    pub fn from_bool(b: bool) -> Self {
        Value::Int(b as i64)
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
        }
    }

    /// Integer view of a numeric value. Unsigned values are reinterpreted.
    pub fn as_int(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::Int(v) => Ok(*v),
            Value::UInt(v) => Ok(*v as i64),
            other => Err(RuntimeError::TypeMismatch {
                expected: "int",
                actual: other.type_name(),
            }),
        }
    }

    /// Float view of any numeric value.
    pub fn as_float(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Int(v) => Ok(*v as f64),
            Value::UInt(v) => Ok(*v as f64),
            Value::Float(v) => Ok(*v),
            other => Err(RuntimeError::TypeMismatch {
                expected: "float",
                actual: other.type_name(),
            }),
        }
    }

    pub fn as_str(&self) -> Option<&NightStr> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is an integer or float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// Truth value: nonzero numbers and non-empty strings and arrays.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(v) => *v != 0,
            Value::UInt(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
