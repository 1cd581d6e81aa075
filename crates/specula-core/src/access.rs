//! Forced-access field and method primitives
//!
//! A [`FieldHandle`] or [`MethodHandle`] names one declared member of one
//! class. Handles are only obtained by looking a member up in the registry.
//! Non-public members must be made accessible before use, and every access
//! is checked against the registry's [`AccessPolicy`](crate::AccessPolicy).

use crate::builtins::core_class_ids;
use crate::class_registry::ClassRegistry;
use crate::object::{Class, ClassId, FieldDecl, MethodDecl, Modifiers};
use crate::permissions::ReflectionPermission;
use crate::primitive::PrimitiveKind;
use crate::value::Value;
use crate::{HostError, HostResult};

/// Handle to a declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    declaring_class: ClassId,
    index: usize,
    accessible: bool,
}

/// Handle to a declared method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHandle {
    declaring_class: ClassId,
    index: usize,
    accessible: bool,
}

fn open_member(
    registry: &ClassRegistry,
    class: &Class,
    member: &str,
    modifiers: Modifiers,
    flag: bool,
) -> HostResult<()> {
    if flag && !modifiers.is_public() && registry.policy().is_sealed(class.package()) {
        return Err(HostError::InaccessibleObject {
            class: class.name.clone(),
            member: member.to_string(),
            package: class.package().to_string(),
        });
    }
    Ok(())
}

impl FieldHandle {
    /// Class declaring the field
    pub fn declaring_class(&self) -> ClassId {
        self.declaring_class
    }

    /// Declaration index inside the declaring class
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether access checks for non-public fields are suppressed
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Declaration of the field
    pub fn decl<'r>(&self, registry: &'r ClassRegistry) -> HostResult<&'r FieldDecl> {
        registry.field_decl(self).map(|(_, field)| field)
    }

    /// Set the accessible flag
    ///
    /// Fails with `InaccessibleObject` for a non-public field of a sealed
    /// package.
    pub fn set_accessible(&mut self, registry: &ClassRegistry, flag: bool) -> HostResult<()> {
        let (class, field) = registry.field_decl(self)?;
        open_member(registry, class, &field.name, field.modifiers, flag)?;
        self.accessible = flag;
        Ok(())
    }
}

impl MethodHandle {
    /// Class declaring the method
    pub fn declaring_class(&self) -> ClassId {
        self.declaring_class
    }

    /// Declaration index inside the declaring class
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether access checks for non-public methods are suppressed
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Declaration of the method
    pub fn decl<'r>(&self, registry: &'r ClassRegistry) -> HostResult<&'r MethodDecl> {
        registry.method_decl(self).map(|(_, method)| method)
    }

    /// Set the accessible flag
    ///
    /// Fails with `InaccessibleObject` for a non-public method of a sealed
    /// package.
    pub fn set_accessible(&mut self, registry: &ClassRegistry, flag: bool) -> HostResult<()> {
        let (class, method) = registry.method_decl(self)?;
        open_member(registry, class, &method.name, method.modifiers, flag)?;
        self.accessible = flag;
        Ok(())
    }
}

impl ClassRegistry {
    /// Handle for a field declared directly by `class`
    pub fn field_handle(&self, class: ClassId, name: &str) -> Option<FieldHandle> {
        let (index, _) = self.get_class(class)?.declared_field(name)?;
        Some(FieldHandle {
            declaring_class: class,
            index,
            accessible: false,
        })
    }

    /// Handle for a method declared directly by `class` with exactly these
    /// parameter types
    pub fn method_handle(&self, class: ClassId, name: &str, params: &[ClassId]) -> Option<MethodHandle> {
        let (index, _) = self.get_class(class)?.declared_method(name, params)?;
        Some(MethodHandle {
            declaring_class: class,
            index,
            accessible: false,
        })
    }

    /// Handles for every method declared directly by `class`
    pub fn method_handles(&self, class: ClassId) -> Vec<MethodHandle> {
        let count = self.get_class(class).map_or(0, |c| c.methods.len());
        (0..count)
            .map(|index| MethodHandle {
                declaring_class: class,
                index,
                accessible: false,
            })
            .collect()
    }

    fn field_decl(&self, handle: &FieldHandle) -> HostResult<(&Class, &FieldDecl)> {
        let class = self.class(handle.declaring_class)?;
        let field = class.fields.get(handle.index).ok_or_else(|| {
            HostError::RuntimeError(format!("{} has no field #{}", class.name, handle.index))
        })?;
        Ok((class, field))
    }

    fn method_decl(&self, handle: &MethodHandle) -> HostResult<(&Class, &MethodDecl)> {
        let class = self.class(handle.declaring_class)?;
        let method = class.methods.get(handle.index).ok_or_else(|| {
            HostError::RuntimeError(format!("{} has no method #{}", class.name, handle.index))
        })?;
        Ok((class, method))
    }

    fn check_access(
        &self,
        class: &Class,
        member: &str,
        modifiers: Modifiers,
        accessible: bool,
        required: ReflectionPermission,
        action: &'static str,
    ) -> HostResult<()> {
        if !modifiers.is_public() && !accessible {
            return Err(HostError::IllegalAccess {
                class: class.name.clone(),
                member: member.to_string(),
                reason: format!("{:?} member is not accessible", modifiers.visibility),
            });
        }
        if !self.policy().check(&class.name, required) {
            return Err(HostError::AccessDenied {
                class: class.name.clone(),
                member: member.to_string(),
                action,
            });
        }
        Ok(())
    }

    fn check_receiver<'v>(
        &self,
        class: &Class,
        member: &str,
        instance: Option<&'v Value>,
    ) -> HostResult<&'v Value> {
        match instance {
            None | Some(Value::Null) => Err(HostError::NullPointer(format!(
                "{}.{} needs an instance",
                class.name, member
            ))),
            Some(value) if self.is_instance(value, class.id) => Ok(value),
            Some(value) => Err(HostError::IllegalArgument(format!(
                "{} is not an instance of {}",
                value.type_name(),
                class.name
            ))),
        }
    }

    /// Read a field
    ///
    /// `instance` is ignored for static fields.
    pub fn field_get(&self, handle: &FieldHandle, instance: Option<&Value>) -> HostResult<Value> {
        let (class, field) = self.field_decl(handle)?;
        let public = field.modifiers.is_public();
        self.check_access(
            class,
            &field.name,
            field.modifiers,
            handle.accessible,
            ReflectionPermission::read(public),
            "read",
        )?;

        let value = if field.modifiers.is_static {
            class.get_static_field(field.slot)
        } else {
            let receiver = self.check_receiver(class, &field.name, instance)?;
            receiver.as_object().and_then(|obj| obj.get_field(field.slot))
        };

        value.ok_or_else(|| {
            HostError::RuntimeError(format!("{}.{} has no storage", class.name, field.name))
        })
    }

    /// Write a field
    ///
    /// `instance` is ignored for static fields. Static final fields can
    /// never be written.
    pub fn field_set(&self, handle: &FieldHandle, instance: Option<&Value>, value: Value) -> HostResult<()> {
        let (class, field) = self.field_decl(handle)?;
        let public = field.modifiers.is_public();
        self.check_access(
            class,
            &field.name,
            field.modifiers,
            handle.accessible,
            ReflectionPermission::write(public),
            "write",
        )?;

        if field.modifiers.is_final && (field.modifiers.is_static || !handle.accessible) {
            return Err(HostError::IllegalAccess {
                class: class.name.clone(),
                member: field.name.clone(),
                reason: "cannot set final field".to_string(),
            });
        }

        let value = self.coerce(value, field.ty)?;

        let stored = if field.modifiers.is_static {
            class.set_static_field(field.slot, value)
        } else {
            let receiver = self.check_receiver(class, &field.name, instance)?;
            match receiver.as_object() {
                Some(obj) => obj.set_field(field.slot, value),
                None => Err(format!("{} has no fields", receiver.type_name())),
            }
        };
        stored.map_err(HostError::RuntimeError)
    }

    /// Invoke a method
    ///
    /// `receiver` is ignored for static methods. Arguments are converted to
    /// the declared parameter types first; an error returned by the body is
    /// wrapped in `InvocationTarget`.
    pub fn method_invoke(
        &self,
        handle: &MethodHandle,
        receiver: Option<&Value>,
        args: Vec<Value>,
    ) -> HostResult<Value> {
        let (class, method) = self.method_decl(handle)?;
        let public = method.modifiers.is_public();
        self.check_access(
            class,
            &method.name,
            method.modifiers,
            handle.accessible,
            ReflectionPermission::invoke(public),
            "invoke",
        )?;

        let receiver = if method.modifiers.is_static {
            None
        } else {
            Some(self.check_receiver(class, &method.name, receiver)?)
        };

        if args.len() != method.params.len() {
            return Err(HostError::IllegalArgument(format!(
                "wrong number of arguments for {}.{}: expected {}, got {}",
                class.name,
                method.name,
                method.params.len(),
                args.len()
            )));
        }

        let args = args
            .into_iter()
            .zip(&method.params)
            .map(|(arg, &ty)| self.coerce(arg, ty))
            .collect::<HostResult<Vec<_>>>()?;

        let result = (method.body)(self, receiver, &args).map_err(|e| HostError::InvocationTarget {
            method: format!("{}.{}", class.name, method.name),
            source: Box::new(e),
        })?;

        if method.return_type == core_class_ids::VOID {
            Ok(Value::Null)
        } else {
            Ok(result)
        }
    }

    /// Convert a value for storage into, or passing as, `target`
    ///
    /// Primitive targets accept the same kind or a kind that widens to it.
    /// Reference targets accept null and any value whose run-time class is
    /// a subtype.
    pub fn coerce(&self, value: Value, target: ClassId) -> HostResult<Value> {
        if let Some(kind) = PrimitiveKind::from_class_id(target) {
            return value.widen(kind).ok_or_else(|| {
                HostError::IllegalArgument(format!("cannot convert {} to {}", value.type_name(), kind))
            });
        }
        if target == core_class_ids::VOID {
            return Err(HostError::IllegalArgument(format!(
                "cannot convert {} to void",
                value.type_name()
            )));
        }
        if value.is_null() || self.is_instance(&value, target) {
            return Ok(value);
        }
        Err(HostError::IllegalArgument(format!(
            "{} is not assignable to {}",
            value.type_name(),
            self.class_name(target)
        )))
    }
}
