//! Runtime value representation
//!
//! A `Value` is what fields hold, what methods receive and what they return.
//! Primitive payloads are stored inline; their run-time class is always the
//! boxed counterpart (an `Int` reports `Integer`), so a bare value cannot tell
//! `int` and `Integer` signatures apart.

use std::fmt;
use std::sync::Arc;

use crate::builtins::core_class_ids;
use crate::object::{ClassId, ObjectRef};
use crate::primitive::PrimitiveKind;

/// Dynamically typed runtime value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent reference
    #[default]
    Null,
    /// `byte` payload
    Byte(i8),
    /// `short` payload
    Short(i16),
    /// `int` payload
    Int(i32),
    /// `long` payload
    Long(i64),
    /// `float` payload
    Float(f32),
    /// `double` payload
    Double(f64),
    /// `boolean` payload
    Bool(bool),
    /// `char` payload
    Char(char),
    /// Immutable string
    Str(Arc<str>),
    /// Heap object instance
    Object(ObjectRef),
    /// A class used as a value (static member receiver)
    Class(ClassId),
}

impl Value {
    /// Create a null value
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Check if value is null
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Primitive kind of an inline payload
    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Byte(_) => Some(PrimitiveKind::Byte),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::Bool(_) => Some(PrimitiveKind::Boolean),
            Value::Char(_) => Some(PrimitiveKind::Char),
            _ => None,
        }
    }

    /// Run-time class of the value, `None` for null
    pub fn runtime_class(&self) -> Option<ClassId> {
        match self {
            Value::Null => None,
            Value::Str(_) => Some(core_class_ids::STRING),
            Value::Object(obj) => Some(obj.class_id()),
            Value::Class(_) => Some(core_class_ids::CLASS),
            other => other.primitive_kind().map(PrimitiveKind::boxed_class_id),
        }
    }

    /// Get as bool
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i32 (only for `Int` payloads)
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get any integral payload (including `char`) as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(b) => Some(i64::from(*b)),
            Value::Short(s) => Some(i64::from(*s)),
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(l) => Some(*l),
            Value::Char(c) => Some(i64::from(u32::from(*c))),
            _ => None,
        }
    }

    /// Get any numeric payload (including `char`) as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f64::from(*f)),
            Value::Double(d) => Some(*d),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    /// Get as char
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Get as object reference
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get as class handle
    pub const fn as_class(&self) -> Option<ClassId> {
        match self {
            Value::Class(id) => Some(*id),
            _ => None,
        }
    }

    /// Apply an identity or widening primitive conversion to `target`
    ///
    /// Returns `None` when the value is not a primitive payload or does not
    /// widen to `target`.
    pub fn widen(&self, target: PrimitiveKind) -> Option<Value> {
        let source = self.primitive_kind()?;
        if !source.widens_to(target) {
            return None;
        }
        let widened = match target {
            PrimitiveKind::Boolean | PrimitiveKind::Char | PrimitiveKind::Byte => self.clone(),
            PrimitiveKind::Short => Value::Short(self.as_i64()? as i16),
            PrimitiveKind::Int => Value::Int(self.as_i64()? as i32),
            PrimitiveKind::Long => Value::Long(self.as_i64()?),
            PrimitiveKind::Float => match self {
                Value::Float(f) => Value::Float(*f),
                other => Value::Float(other.as_i64()? as f32),
            },
            PrimitiveKind::Double => Value::Double(self.as_f64()?),
        };
        Some(widened)
    }

    /// Get type name for debugging
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "String",
            Value::Object(_) => "object",
            Value::Class(_) => "Class",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "char",
        }
    }
}

// Objects compare by identity; everything else by payload.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Byte(b) => write!(f, "byte({})", b),
            Value::Short(s) => write!(f, "short({})", s),
            Value::Int(i) => write!(f, "int({})", i),
            Value::Long(l) => write!(f, "long({})", l),
            Value::Float(x) => write!(f, "float({})", x),
            Value::Double(x) => write!(f, "double({})", x),
            Value::Bool(b) => write!(f, "boolean({})", b),
            Value::Char(c) => write!(f, "char({:?})", c),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Object(obj) => write!(f, "object({}@{:#x})", obj.class_id(), obj.object_id()),
            Value::Class(id) => write!(f, "class({})", id),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Short(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "[object@{:#x}]", obj.object_id()),
            Value::Class(id) => write!(f, "[class {}]", id),
        }
    }
}

macro_rules! impl_from_payload {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_payload! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    char => Char,
    ObjectRef => Object,
    ClassId => Class,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}
