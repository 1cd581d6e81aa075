//! Argument wrappers
//!
//! A bare [`Value`] only tells the resolver its run-time class, and for a
//! primitive payload that is always the boxed class. [`Arg`] lets a call
//! site state the static type explicitly, or pass null with a type.

use specula_core::{ClassId, ObjectRef, PrimitiveKind, Value};

/// A call argument, optionally annotated with its static type
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Plain value; resolves by its run-time class
    Value(Value),
    /// Null, resolved as if it had the given static type
    Null(ClassId),
    /// Value resolved as if it had the given static type
    Typed(ClassId, Value),
}

impl Arg {
    /// Null with a static type
    pub fn null_value(ty: ClassId) -> Self {
        Arg::Null(ty)
    }

    /// Value with an explicit static type
    pub fn typed(value: impl Into<Value>, ty: ClassId) -> Self {
        Arg::Typed(ty, value.into())
    }

    /// Primitive argument, typed by its Rust type (`i32` as `int`, `i64`
    /// as `long` and so on)
    pub fn primitive<T: PrimitiveArg>(value: T) -> Self {
        Arg::Typed(T::KIND.class_id(), value.into())
    }

    /// `byte` argument
    pub fn byte(value: i8) -> Self {
        Self::primitive(value)
    }

    /// `short` argument
    pub fn short(value: i16) -> Self {
        Self::primitive(value)
    }

    /// `int` argument
    pub fn int(value: i32) -> Self {
        Self::primitive(value)
    }

    /// `long` argument
    pub fn long(value: i64) -> Self {
        Self::primitive(value)
    }

    /// `float` argument
    pub fn float(value: f32) -> Self {
        Self::primitive(value)
    }

    /// `double` argument
    pub fn double(value: f64) -> Self {
        Self::primitive(value)
    }

    /// `boolean` argument
    pub fn boolean(value: bool) -> Self {
        Self::primitive(value)
    }

    /// `char` argument
    pub fn character(value: char) -> Self {
        Self::primitive(value)
    }

    /// Static type used for overload matching; `None` for a bare null
    pub fn static_type(&self) -> Option<ClassId> {
        match self {
            Arg::Value(value) => value.runtime_class(),
            Arg::Null(ty) | Arg::Typed(ty, _) => Some(*ty),
        }
    }

    /// Strip the annotation
    pub fn into_value(self) -> Value {
        match self {
            Arg::Value(value) | Arg::Typed(_, value) => value,
            Arg::Null(_) => Value::Null,
        }
    }
}

/// Rust types that map onto a host primitive
pub trait PrimitiveArg: Into<Value> {
    /// Host primitive kind
    const KIND: PrimitiveKind;
}

macro_rules! primitive_args {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl PrimitiveArg for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$kind;
            }
        )*
    };
}

primitive_args! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    char => Char,
}

macro_rules! plain_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

plain_args!(i8, i16, i32, i64, f32, f64, bool, char, &str, String, ObjectRef, ClassId);

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specula_core::core_class_ids;

    #[test]
    fn test_primitive_constructors() {
        assert_eq!(Arg::int(5), Arg::Typed(core_class_ids::INT, Value::Int(5)));
        assert_eq!(Arg::long(5), Arg::Typed(core_class_ids::LONG, Value::Long(5)));
        assert_eq!(Arg::character('c').static_type(), Some(core_class_ids::CHAR));
        assert_eq!(Arg::boolean(true).static_type(), Some(core_class_ids::BOOLEAN));
        assert_eq!(Arg::primitive(2.5f32), Arg::float(2.5));
        assert_eq!(Arg::primitive(7i16), Arg::short(7));
    }

    #[test]
    fn test_plain_values_use_runtime_class() {
        assert_eq!(Arg::from(5i32).static_type(), Some(core_class_ids::BOXED_INT));
        assert_eq!(Arg::from("s").static_type(), Some(core_class_ids::STRING));
        assert_eq!(Arg::from(Value::Null).static_type(), None);
    }

    #[test]
    fn test_null_and_typed() {
        let null = Arg::null_value(core_class_ids::STRING);
        assert_eq!(null.static_type(), Some(core_class_ids::STRING));
        assert_eq!(null.into_value(), Value::Null);

        let typed = Arg::typed(3i32, core_class_ids::OBJECT);
        assert_eq!(typed.static_type(), Some(core_class_ids::OBJECT));
        assert_eq!(typed.into_value(), Value::Int(3));
    }
}
