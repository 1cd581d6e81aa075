//! Builtin classes
//!
//! Every `ClassRegistry` registers these types first and in a fixed order, so
//! their ids are the same constants in every registry. Process-wide tables
//! keyed by builtin ids (such as the primitive wrapper table) rely on this.

use std::sync::Arc;

use crate::class_registry::ClassRegistry;
use crate::object::{Class, ClassId, ClassKind, MethodDecl, Modifiers, NativeMethod};
use crate::primitive::PrimitiveKind;
use crate::value::Value;

/// Well-known class IDs for core types
pub mod core_class_ids {
    use crate::object::ClassId;

    /// Root of every class hierarchy
    pub const OBJECT: ClassId = ClassId(0);
    /// `void` pseudo-type (method return type only)
    pub const VOID: ClassId = ClassId(1);
    /// Primitive `byte`
    pub const BYTE: ClassId = ClassId(2);
    /// Primitive `short`
    pub const SHORT: ClassId = ClassId(3);
    /// Primitive `int`
    pub const INT: ClassId = ClassId(4);
    /// Primitive `long`
    pub const LONG: ClassId = ClassId(5);
    /// Primitive `float`
    pub const FLOAT: ClassId = ClassId(6);
    /// Primitive `double`
    pub const DOUBLE: ClassId = ClassId(7);
    /// Primitive `boolean`
    pub const BOOLEAN: ClassId = ClassId(8);
    /// Primitive `char`
    pub const CHAR: ClassId = ClassId(9);
    /// Boxed `Byte`
    pub const BOXED_BYTE: ClassId = ClassId(10);
    /// Boxed `Short`
    pub const BOXED_SHORT: ClassId = ClassId(11);
    /// Boxed `Integer`
    pub const BOXED_INT: ClassId = ClassId(12);
    /// Boxed `Long`
    pub const BOXED_LONG: ClassId = ClassId(13);
    /// Boxed `Float`
    pub const BOXED_FLOAT: ClassId = ClassId(14);
    /// Boxed `Double`
    pub const BOXED_DOUBLE: ClassId = ClassId(15);
    /// Boxed `Boolean`
    pub const BOXED_BOOLEAN: ClassId = ClassId(16);
    /// Boxed `Character`
    pub const BOXED_CHAR: ClassId = ClassId(17);
    /// `String`
    pub const STRING: ClassId = ClassId(18);
    /// `Class`
    pub const CLASS: ClassId = ClassId(19);

    /// Number of builtin classes (first free user class ID)
    pub const BUILTIN_COUNT: usize = 20;
}

fn native<F>(body: F) -> NativeMethod
where
    F: Fn(&ClassRegistry, Option<&Value>, &[Value]) -> crate::HostResult<Value> + Send + Sync + 'static,
{
    Arc::new(body)
}

fn object_class() -> Class {
    let mut class = Class::new(core_class_ids::OBJECT, "Object".to_string(), ClassKind::Class);

    class.add_method(MethodDecl {
        name: "toString".to_string(),
        params: Vec::new(),
        return_type: core_class_ids::STRING,
        modifiers: Modifiers::PUBLIC,
        body: native(|registry, receiver, _| {
            let text = match receiver {
                Some(Value::Object(obj)) => {
                    let name = registry
                        .get_class(obj.class_id())
                        .map(|c| c.name.as_str())
                        .unwrap_or("?");
                    format!("{}@{:x}", name, obj.object_id())
                }
                Some(other) => other.to_string(),
                None => "null".to_string(),
            };
            Ok(Value::from(text))
        }),
    });

    class.add_method(MethodDecl {
        name: "equals".to_string(),
        params: vec![core_class_ids::OBJECT],
        return_type: core_class_ids::BOOLEAN,
        modifiers: Modifiers::PUBLIC,
        body: native(|_, receiver, args| {
            let other = args.first().cloned().unwrap_or_default();
            Ok(Value::Bool(receiver.map_or(false, |r| *r == other)))
        }),
    });

    class.add_method(MethodDecl {
        name: "hashCode".to_string(),
        params: Vec::new(),
        return_type: core_class_ids::INT,
        modifiers: Modifiers::PUBLIC,
        body: native(|_, receiver, _| {
            let hash = match receiver {
                Some(Value::Object(obj)) => obj.object_id() as i32,
                _ => 0,
            };
            Ok(Value::Int(hash))
        }),
    });

    class
}

fn leaf_class(id: ClassId, name: &str) -> Class {
    let mut class = Class::new(id, name.to_string(), ClassKind::Class);
    class.superclass = Some(core_class_ids::OBJECT);
    class
}

/// Register the builtin classes into an empty registry
pub(crate) fn bootstrap(registry: &mut ClassRegistry) {
    debug_assert_eq!(registry.len(), 0);

    registry.insert_class(object_class());
    registry.insert_class(Class::new(core_class_ids::VOID, "void".to_string(), ClassKind::Void));

    for kind in PrimitiveKind::ALL {
        registry.insert_class(Class::new(
            kind.class_id(),
            kind.name().to_string(),
            ClassKind::Primitive(kind),
        ));
    }
    for kind in PrimitiveKind::ALL {
        registry.insert_class(leaf_class(kind.boxed_class_id(), kind.boxed_name()));
    }

    registry.insert_class(leaf_class(core_class_ids::STRING, "String"));
    registry.insert_class(leaf_class(core_class_ids::CLASS, "Class"));

    debug_assert_eq!(registry.len(), core_class_ids::BUILTIN_COUNT);
}
