//! Primitive kinds and widening conversions

use std::fmt;

use crate::builtins::core_class_ids;
use crate::object::ClassId;
use crate::value::Value;

/// The eight host primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit IEEE 754 float
    Float,
    /// 64-bit IEEE 754 float
    Double,
    /// Boolean
    Boolean,
    /// Unicode character
    Char,
}

impl PrimitiveKind {
    /// All primitive kinds, in class id order
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Boolean,
        PrimitiveKind::Char,
    ];

    /// Name of the primitive class
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Char => "char",
        }
    }

    /// Name of the boxed counterpart class
    pub const fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Char => "Character",
        }
    }

    /// Class id of the primitive type
    pub const fn class_id(self) -> ClassId {
        match self {
            PrimitiveKind::Byte => core_class_ids::BYTE,
            PrimitiveKind::Short => core_class_ids::SHORT,
            PrimitiveKind::Int => core_class_ids::INT,
            PrimitiveKind::Long => core_class_ids::LONG,
            PrimitiveKind::Float => core_class_ids::FLOAT,
            PrimitiveKind::Double => core_class_ids::DOUBLE,
            PrimitiveKind::Boolean => core_class_ids::BOOLEAN,
            PrimitiveKind::Char => core_class_ids::CHAR,
        }
    }

    /// Class id of the boxed counterpart
    pub const fn boxed_class_id(self) -> ClassId {
        match self {
            PrimitiveKind::Byte => core_class_ids::BOXED_BYTE,
            PrimitiveKind::Short => core_class_ids::BOXED_SHORT,
            PrimitiveKind::Int => core_class_ids::BOXED_INT,
            PrimitiveKind::Long => core_class_ids::BOXED_LONG,
            PrimitiveKind::Float => core_class_ids::BOXED_FLOAT,
            PrimitiveKind::Double => core_class_ids::BOXED_DOUBLE,
            PrimitiveKind::Boolean => core_class_ids::BOXED_BOOLEAN,
            PrimitiveKind::Char => core_class_ids::BOXED_CHAR,
        }
    }

    /// Look up the primitive kind whose primitive class is `id`
    pub fn from_class_id(id: ClassId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.class_id() == id)
    }

    /// Look up the primitive kind whose boxed class is `id`
    pub fn from_boxed_class_id(id: ClassId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.boxed_class_id() == id)
    }

    /// Zero value used to initialize fields of this type
    pub const fn default_value(self) -> Value {
        match self {
            PrimitiveKind::Byte => Value::Byte(0),
            PrimitiveKind::Short => Value::Short(0),
            PrimitiveKind::Int => Value::Int(0),
            PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Float => Value::Float(0.0),
            PrimitiveKind::Double => Value::Double(0.0),
            PrimitiveKind::Boolean => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
        }
    }

    /// Whether a value of this kind can be stored into `target` (identity or
    /// widening primitive conversion)
    pub const fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        matches!(
            (self, target),
            (Byte, Byte)
                | (Short, Short)
                | (Int, Int)
                | (Long, Long)
                | (Float, Float)
                | (Double, Double)
                | (Boolean, Boolean)
                | (Char, Char)
                | (Byte, Short | Int | Long | Float | Double)
                | (Short, Int | Long | Float | Double)
                | (Char, Int | Long | Float | Double)
                | (Int, Long | Float | Double)
                | (Long, Float | Double)
                | (Float, Double)
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
