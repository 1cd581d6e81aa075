//! Member resolution
//!
//! Candidate names are tried in the order given. Each name is looked up in
//! the starting class and then in every superclass up to `Object` before
//! the next name is tried, so an earlier name declared high in the
//! hierarchy wins over a later name declared in the class itself.
//! Interfaces are never searched for declarations.

use rustc_hash::FxHashSet;
use specula_core::{ClassId, ClassRegistry, FieldHandle, MethodHandle};
use tracing::trace;

use crate::error::{ReflectError, ReflectResult};
use crate::wrapper::Arg;

/// Find a field by candidate names and make it accessible
///
/// Returns `Ok(None)` when no candidate name is declared anywhere in the
/// superclass chain. Making the field accessible may be refused by the
/// host, which is an error.
pub fn get_field(
    registry: &ClassRegistry,
    class: ClassId,
    names: &[&str],
) -> ReflectResult<Option<FieldHandle>> {
    for name in names {
        for current in registry.ancestors(class) {
            if let Some(mut field) = registry.field_handle(current.id, name) {
                field.set_accessible(registry, true)?;
                trace!(class = %current.name, field = %name, "resolved field");
                return Ok(Some(field));
            }
        }
    }
    Ok(None)
}

/// Static types of call arguments
///
/// A bare null has no static type and is rejected.
pub fn argument_types(args: &[Arg]) -> ReflectResult<Vec<ClassId>> {
    args.iter()
        .enumerate()
        .map(|(index, arg)| arg.static_type().ok_or(ReflectError::NullArgument { index }))
        .collect()
}

/// Find a method by candidate names whose parameter types exactly match the
/// static types of `args`
///
/// Returns `Ok(None)` when `class` is `None` or nothing matches.
pub fn get_method(
    registry: &ClassRegistry,
    class: Option<ClassId>,
    names: &[&str],
    args: &[Arg],
) -> ReflectResult<Option<MethodHandle>> {
    let Some(class) = class else {
        return Ok(None);
    };
    let types = argument_types(args)?;
    Ok(get_method_by_types(registry, class, names, &types))
}

/// Find a method by candidate names and exact parameter types
pub fn get_method_by_types(
    registry: &ClassRegistry,
    class: ClassId,
    names: &[&str],
    types: &[ClassId],
) -> Option<MethodHandle> {
    names
        .iter()
        .find_map(|name| get_declared_method(registry, class, name, types))
}

/// Find a method with one name and exact parameter types in `class` or its
/// superclasses
pub fn get_declared_method(
    registry: &ClassRegistry,
    class: ClassId,
    name: &str,
    types: &[ClassId],
) -> Option<MethodHandle> {
    registry.ancestors(class).find_map(|current| {
        let method = registry.method_handle(current.id, name, types)?;
        trace!(class = %current.name, method = %name, "resolved method");
        Some(method)
    })
}

/// Every method declared by `class` and its superclasses, most derived
/// class first
pub fn get_all_methods(registry: &ClassRegistry, class: ClassId) -> Vec<MethodHandle> {
    registry
        .ancestors(class)
        .flat_map(|current| registry.method_handles(current.id))
        .collect()
}

/// Interfaces implemented directly by `class` or any of its superclasses,
/// without duplicates, in first-seen order
pub fn get_all_interfaces(registry: &ClassRegistry, class: ClassId) -> Vec<ClassId> {
    let mut seen = FxHashSet::default();
    registry
        .ancestors(class)
        .flat_map(|current| current.interfaces.iter().copied())
        .filter(|interface| seen.insert(*interface))
        .collect()
}
