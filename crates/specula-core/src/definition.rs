//! Class definitions
//!
//! Fluent descriptions of user classes, handed to
//! [`ClassRegistry::define`](crate::ClassRegistry::define).

use std::sync::Arc;

use crate::builtins::core_class_ids;
use crate::object::{ClassId, Modifiers, NativeMethod, Visibility};
use crate::value::Value;
use crate::{ClassRegistry, HostResult};

/// Definition for a field to be added to a class
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: ClassId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Initial value (the type's default when absent)
    pub initial_value: Option<Value>,
}

impl FieldDefinition {
    /// Create a package-private instance field
    pub fn new(name: impl Into<String>, ty: ClassId) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::PACKAGE,
            initial_value: None,
        }
    }

    /// Set the visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers.visibility = visibility;
        self
    }

    /// Make the field public
    pub fn public(self) -> Self {
        self.visibility(Visibility::Public)
    }

    /// Make the field private
    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    /// Make the field protected
    pub fn protected(self) -> Self {
        self.visibility(Visibility::Protected)
    }

    /// Mark as static field
    pub fn as_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Mark as final
    pub fn as_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// Set the initial value
    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}

/// Definition for a method to be added to a class
#[derive(Clone)]
pub struct MethodDefinition {
    /// Method name
    pub name: String,
    /// Exact parameter types
    pub params: Vec<ClassId>,
    /// Return type
    pub return_type: ClassId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Implementation
    pub body: NativeMethod,
}

impl MethodDefinition {
    /// Create a package-private instance method returning `void`
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&ClassRegistry, Option<&Value>, &[Value]) -> HostResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: core_class_ids::VOID,
            modifiers: Modifiers::PACKAGE,
            body: Arc::new(body),
        }
    }

    /// Add a parameter
    pub fn param(mut self, ty: ClassId) -> Self {
        self.params.push(ty);
        self
    }

    /// Set all parameters
    pub fn params(mut self, params: &[ClassId]) -> Self {
        self.params = params.to_vec();
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: ClassId) -> Self {
        self.return_type = ty;
        self
    }

    /// Set the visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers.visibility = visibility;
        self
    }

    /// Make the method public
    pub fn public(self) -> Self {
        self.visibility(Visibility::Public)
    }

    /// Make the method private
    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    /// Make the method protected
    pub fn protected(self) -> Self {
        self.visibility(Visibility::Protected)
    }

    /// Mark as static method
    pub fn as_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }
}

impl std::fmt::Debug for MethodDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDefinition")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

/// Whether a definition describes a class or an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// Regular class
    Class,
    /// Interface
    Interface,
}

/// Complete definition for registering a class
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// Fully qualified name
    pub name: String,
    /// Class or interface
    pub kind: DefinitionKind,
    /// Superclass (`Object` when absent)
    pub superclass: Option<ClassId>,
    /// Implemented (or extended, for interfaces) interfaces
    pub interfaces: Vec<ClassId>,
    /// Declared fields
    pub fields: Vec<FieldDefinition>,
    /// Declared methods
    pub methods: Vec<MethodDefinition>,
}

impl ClassDefinition {
    /// Create a new empty class definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DefinitionKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create a new empty interface definition
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: DefinitionKind::Interface,
            ..Self::new(name)
        }
    }

    /// Set the superclass
    pub fn extends(mut self, superclass: ClassId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Add an interface implementation
    pub fn implements(mut self, interface: ClassId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a field to the definition
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method to the definition
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a field, marking it static
    pub fn static_field(self, field: FieldDefinition) -> Self {
        self.field(field.as_static())
    }

    /// Add a method, marking it static
    pub fn static_method(self, method: MethodDefinition) -> Self {
        self.method(method.as_static())
    }

    /// Count instance fields (non-static)
    pub fn instance_field_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.modifiers.is_static).count()
    }

    /// Count static fields
    pub fn static_field_count(&self) -> usize {
        self.fields.iter().filter(|f| f.modifiers.is_static).count()
    }
}
