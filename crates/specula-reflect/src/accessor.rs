//! Property access and method calls by name
//!
//! Every entry point resolves the member first and fails with a
//! precondition error naming the candidates when nothing matches. Errors
//! from the host (policy refusals, wrong receivers, exceptions thrown by a
//! method body) are passed through as [`ReflectError::Host`].

use specula_core::{ClassId, ClassRegistry, Value};

use crate::error::{ReflectError, ReflectResult};
use crate::loader::get_class;
use crate::resolver::{get_field, get_method};
use crate::wrapper::Arg;

/// Class to search when the caller did not name one
///
/// A class value stands for the class itself, so static members can be
/// reached through it.
fn target_class(class: Option<ClassId>, instance: &Value) -> ReflectResult<ClassId> {
    match (class, instance) {
        (Some(class), _) => Ok(class),
        (None, Value::Class(class)) => Ok(*class),
        (None, value) => value.runtime_class().ok_or(ReflectError::NullInstance),
    }
}

/// Read a field
///
/// Searches `class`, or the run-time class of `instance` when `class` is
/// `None`. For static fields `instance` is not used and may be null.
pub fn get_property(
    registry: &ClassRegistry,
    class: Option<ClassId>,
    instance: &Value,
    names: &[&str],
) -> ReflectResult<Value> {
    let class = target_class(class, instance)?;
    let field = get_field(registry, class, names)?
        .ok_or_else(|| ReflectError::field_not_found(names))?;
    Ok(registry.field_get(&field, Some(instance))?)
}

/// Read a field, naming the class by its fully qualified name
///
/// An empty class name falls back to the class of `instance`.
pub fn get_property_by_name(
    registry: &ClassRegistry,
    class_name: &str,
    instance: &Value,
    names: &[&str],
) -> ReflectResult<Value> {
    let class = get_class(registry, class_name)?;
    get_property(registry, class, instance, names)
}

/// Read a field of the instance's own class hierarchy
pub fn get_instance_property(
    registry: &ClassRegistry,
    instance: &Value,
    names: &[&str],
) -> ReflectResult<Value> {
    get_property(registry, None, instance, names)
}

/// Write a field
///
/// Type annotations on `value` are stripped before the write.
pub fn set_property(
    registry: &ClassRegistry,
    class: Option<ClassId>,
    instance: &Value,
    value: impl Into<Arg>,
    names: &[&str],
) -> ReflectResult<()> {
    let class = target_class(class, instance)?;
    let field = get_field(registry, class, names)?
        .ok_or_else(|| ReflectError::field_not_found(names))?;
    registry.field_set(&field, Some(instance), value.into().into_value())?;
    Ok(())
}

/// Write a field, naming the class by its fully qualified name
pub fn set_property_by_name(
    registry: &ClassRegistry,
    class_name: &str,
    instance: &Value,
    value: impl Into<Arg>,
    names: &[&str],
) -> ReflectResult<()> {
    let class = get_class(registry, class_name)?;
    set_property(registry, class, instance, value, names)
}

/// Write a field of the instance's own class hierarchy
pub fn set_instance_property(
    registry: &ClassRegistry,
    instance: &Value,
    value: impl Into<Arg>,
    names: &[&str],
) -> ReflectResult<()> {
    set_property(registry, None, instance, value, names)
}

/// Call a method
///
/// The method is resolved in `class` from the static types of `args`, made
/// accessible and invoked on `instance` (`None` for static methods) with
/// the annotations stripped from every argument.
pub fn call(
    registry: &ClassRegistry,
    class: ClassId,
    instance: Option<&Value>,
    names: &[&str],
    args: Vec<Arg>,
) -> ReflectResult<Value> {
    let mut method = get_method(registry, Some(class), names, &args)?
        .ok_or_else(|| ReflectError::method_not_found(names))?;

    let args: Vec<Value> = args.into_iter().map(Arg::into_value).collect();

    method.set_accessible(registry, true)?;
    Ok(registry.method_invoke(&method, instance, args)?)
}

/// Call a method of the instance's own class hierarchy
pub fn call_instance(
    registry: &ClassRegistry,
    instance: &Value,
    names: &[&str],
    args: Vec<Arg>,
) -> ReflectResult<Value> {
    let class = target_class(None, instance)?;
    call(registry, class, Some(instance), names, args)
}

/// Call a static method
pub fn call_static(
    registry: &ClassRegistry,
    class: ClassId,
    name: &str,
    args: Vec<Arg>,
) -> ReflectResult<Value> {
    call(registry, class, None, &[name], args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specula_core::{core_class_ids, ClassDefinition, FieldDefinition, HostError, MethodDefinition};

    fn counter_registry() -> (ClassRegistry, ClassId) {
        let mut registry = ClassRegistry::new();
        let counter = registry
            .define(
                ClassDefinition::new("demo.Counter")
                    .field(FieldDefinition::new("count", core_class_ids::INT).private())
                    .static_field(
                        FieldDefinition::new("LIMIT", core_class_ids::INT)
                            .private()
                            .initial_value(10i32),
                    )
                    .static_method(
                        MethodDefinition::new("twice", |_, _, args| {
                            Ok(Value::Int(args[0].as_i32().unwrap_or(0) * 2))
                        })
                        .param(core_class_ids::INT)
                        .returns(core_class_ids::INT)
                        .private(),
                    ),
            )
            .unwrap();
        (registry, counter)
    }

    #[test]
    fn test_target_class() {
        assert_eq!(
            target_class(Some(core_class_ids::STRING), &Value::Null).unwrap(),
            core_class_ids::STRING
        );
        assert_eq!(
            target_class(None, &Value::Class(core_class_ids::STRING)).unwrap(),
            core_class_ids::STRING
        );
        assert_eq!(target_class(None, &Value::Int(1)).unwrap(), core_class_ids::BOXED_INT);
        assert!(matches!(target_class(None, &Value::Null), Err(ReflectError::NullInstance)));
    }

    #[test]
    fn test_static_property_through_class_value() {
        let (registry, counter) = counter_registry();

        let limit = get_instance_property(&registry, &Value::Class(counter), &["LIMIT"]).unwrap();
        assert_eq!(limit, Value::Int(10));

        let limit = get_property(&registry, Some(counter), &Value::Null, &["LIMIT"]).unwrap();
        assert_eq!(limit, Value::Int(10));
    }

    #[test]
    fn test_instance_property_needs_instance() {
        let (registry, counter) = counter_registry();

        let err = get_property(&registry, Some(counter), &Value::Null, &["count"]).unwrap_err();
        assert!(matches!(err, ReflectError::Host(HostError::NullPointer(_))));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_call_static() {
        let (registry, counter) = counter_registry();

        let result = call_static(&registry, counter, "twice", vec![Arg::int(21)]).unwrap();
        assert_eq!(result, Value::Int(42));

        let err = call_static(&registry, counter, "twice", vec![Arg::long(21)]).unwrap_err();
        assert!(matches!(err, ReflectError::MethodNotFound(ref names) if names == &["twice"]));
    }

    #[test]
    fn test_set_property_strips_annotation() {
        let (registry, counter) = counter_registry();
        let counter_obj = registry.instantiate(counter).unwrap();

        set_instance_property(&registry, &counter_obj, Arg::int(3), &["count"]).unwrap();
        assert_eq!(
            get_instance_property(&registry, &counter_obj, &["count"]).unwrap(),
            Value::Int(3)
        );

        let err = set_instance_property(&registry, &counter_obj, 1i32, &["total"]).unwrap_err();
        assert!(matches!(err, ReflectError::FieldNotFound(_)));
    }
}
