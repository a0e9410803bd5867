//! Structural type descriptors used by the type checker.

use std::fmt;

/// The primitive tag of a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int,
    Float,
    Str,
    Object,
}

impl PrimitiveKind {
    /// Get the source-level name of this primitive.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Str => "str",
            PrimitiveKind::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A value type: either a primitive or an array of some element type.
///
/// Arrays nest through the boxed element type, so `int[][]` is
/// `Array(Array(Primitive(Int)))` and there is exactly one way to spell it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Primitive(PrimitiveKind),
    Array(Box<ValueType>),
}

impl ValueType {
    pub const BOOL: ValueType = ValueType::Primitive(PrimitiveKind::Bool);
    pub const CHAR: ValueType = ValueType::Primitive(PrimitiveKind::Char);
    pub const INT: ValueType = ValueType::Primitive(PrimitiveKind::Int);
    pub const FLOAT: ValueType = ValueType::Primitive(PrimitiveKind::Float);
    pub const STRING: ValueType = ValueType::Primitive(PrimitiveKind::Str);
    pub const OBJECT: ValueType = ValueType::Primitive(PrimitiveKind::Object);

    /// Create an array type with the given element type.
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    /// Whether this is exactly the given primitive (arrays never match).
    pub fn is(&self, kind: PrimitiveKind) -> bool {
        matches!(self, ValueType::Primitive(k) if *k == kind)
    }

    /// Whether this is an array type.
    pub fn is_arr(&self) -> bool {
        matches!(self, ValueType::Array(_))
    }

    /// Whether this type is composite (an object or any array).
    pub fn is_object(&self) -> bool {
        match self {
            ValueType::Primitive(kind) => *kind == PrimitiveKind::Object,
            ValueType::Array(_) => true,
        }
    }

    /// The element type, if this is an array.
    pub fn element(&self) -> Option<&ValueType> {
        match self {
            ValueType::Array(elem) => Some(elem),
            ValueType::Primitive(_) => None,
        }
    }

    /// The innermost primitive tag (`int` for `int[][]`).
    pub fn tag(&self) -> PrimitiveKind {
        match self {
            ValueType::Primitive(kind) => *kind,
            ValueType::Array(elem) => elem.tag(),
        }
    }
}

impl From<PrimitiveKind> for ValueType {
    fn from(kind: PrimitiveKind) -> Self {
        ValueType::Primitive(kind)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Primitive(kind) => write!(f, "{kind}"),
            ValueType::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

/// Check whether two value types are compatible.
///
/// Primitives are compatible only with the same primitive; arrays only with
/// arrays whose element types are themselves compatible. Operators that widen
/// (e.g. `==` accepting any operands) apply their own rules on top of this.
pub fn compare_value_t(a: &ValueType, b: &ValueType) -> bool {
    match (a, b) {
        (ValueType::Primitive(x), ValueType::Primitive(y)) => x == y,
        (ValueType::Array(x), ValueType::Array(y)) => compare_value_t(x, y),
        _ => false,
    }
}
