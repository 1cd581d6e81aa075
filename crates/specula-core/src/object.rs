//! Object model and class system

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::class_registry::ClassRegistry;
use crate::primitive::PrimitiveKind;
use crate::value::Value;
use crate::HostResult;

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Class handle (index into the issuing `ClassRegistry`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Index of the class inside its registry
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a heap object
pub type ObjectRef = Arc<Object>;

/// Object instance
///
/// Field slots are laid out superclass-first, so a field shadowed by a
/// subclass keeps its own slot.
pub struct Object {
    object_id: u64,
    class_id: ClassId,
    fields: RwLock<Vec<Value>>,
}

impl Object {
    /// Create a new object with the given initial slot values
    pub fn new(class_id: ClassId, fields: Vec<Value>) -> Self {
        Self {
            object_id: generate_object_id(),
            class_id,
            fields: RwLock::new(fields),
        }
    }

    /// Unique object ID (assigned on creation)
    pub fn object_id(&self) -> u64 {
        self.object_id
    }

    /// Class of this instance
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Get a field value by slot
    pub fn get_field(&self, slot: usize) -> Option<Value> {
        self.fields.read().get(slot).cloned()
    }

    /// Set a field value by slot
    pub fn set_field(&self, slot: usize, value: Value) -> Result<(), String> {
        let mut fields = self.fields.write();
        let len = fields.len();
        match fields.get_mut(slot) {
            Some(field) => {
                *field = value;
                Ok(())
            }
            None => Err(format!(
                "Field slot {} out of bounds (object has {} fields)",
                slot, len
            )),
        }
    }

    /// Get number of field slots
    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("object_id", &self.object_id)
            .field("class_id", &self.class_id)
            .field("field_count", &self.field_count())
            .finish()
    }
}

/// Declared visibility of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible to subclasses
    Protected,
    /// Visible inside the declaring package
    #[default]
    Package,
    /// Visible inside the declaring class only
    Private,
}

/// Modifier flags for class members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Declared visibility
    pub visibility: Visibility,
    /// Static member
    pub is_static: bool,
    /// Final member (fields only)
    pub is_final: bool,
}

impl Modifiers {
    /// Public instance member
    pub const PUBLIC: Self = Self::with_visibility(Visibility::Public);
    /// Protected instance member
    pub const PROTECTED: Self = Self::with_visibility(Visibility::Protected);
    /// Package-private instance member
    pub const PACKAGE: Self = Self::with_visibility(Visibility::Package);
    /// Private instance member
    pub const PRIVATE: Self = Self::with_visibility(Visibility::Private);

    const fn with_visibility(visibility: Visibility) -> Self {
        Self {
            visibility,
            is_static: false,
            is_final: false,
        }
    }

    /// Mark as static
    pub const fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as final
    pub const fn as_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Whether the member is public
    pub const fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Instantiable class with a superclass chain
    Class,
    /// Interface (no superclass, static fields only)
    Interface,
    /// Primitive type
    Primitive(PrimitiveKind),
    /// The `void` pseudo-type
    Void,
}

/// Native method body
///
/// Receives the registry, the receiver (`None` for static methods) and the
/// already-coerced arguments.
pub type NativeMethod =
    Arc<dyn Fn(&ClassRegistry, Option<&Value>, &[Value]) -> HostResult<Value> + Send + Sync>;

/// Declared field
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: ClassId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Instance slot, or static slot for static fields
    pub slot: usize,
}

/// Declared method
#[derive(Clone)]
pub struct MethodDecl {
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

impl fmt::Debug for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

/// Class definition metadata
pub struct Class {
    /// Class ID (unique within its registry)
    pub id: ClassId,
    /// Fully qualified class name
    pub name: String,
    /// Kind of type
    pub kind: ClassKind,
    /// Superclass (None for the root, interfaces, primitives and void)
    pub superclass: Option<ClassId>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    pub interfaces: Vec<ClassId>,
    /// Declared fields, in declaration order
    pub fields: Vec<FieldDecl>,
    /// Declared methods, in declaration order
    pub methods: Vec<MethodDecl>,
    /// Number of instance slots (including inherited)
    pub field_count: usize,
    /// Initial instance slot values (including inherited)
    pub(crate) instance_template: Vec<Value>,
    /// Static field storage (class-level, shared across all instances)
    static_fields: RwLock<Vec<Value>>,
    /// Field name to declaration index
    field_indices: FxHashMap<String, usize>,
}

impl Class {
    pub(crate) fn new(id: ClassId, name: String, kind: ClassKind) -> Self {
        Self {
            id,
            name,
            kind,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            field_count: 0,
            instance_template: Vec::new(),
            static_fields: RwLock::new(Vec::new()),
            field_indices: FxHashMap::default(),
        }
    }

    pub(crate) fn add_field(&mut self, field: FieldDecl, initial: Value) {
        let index = self.fields.len();
        self.field_indices.insert(field.name.clone(), index);
        if field.modifiers.is_static {
            self.static_fields.get_mut().push(initial);
        } else {
            self.instance_template.push(initial);
            self.field_count += 1;
        }
        self.fields.push(field);
    }

    pub(crate) fn add_method(&mut self, method: MethodDecl) {
        self.methods.push(method);
    }

    /// Declared fields, in declaration order
    pub fn declared_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Declared methods, in declaration order
    pub fn declared_methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    /// Look up a declared field by name (inherited fields are not visible)
    pub fn declared_field(&self, name: &str) -> Option<(usize, &FieldDecl)> {
        let index = *self.field_indices.get(name)?;
        self.fields.get(index).map(|field| (index, field))
    }

    /// Look up a declared method by name and exact parameter types
    pub fn declared_method(&self, name: &str, params: &[ClassId]) -> Option<(usize, &MethodDecl)> {
        self.methods
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name && m.params == params)
    }

    /// Get a static field value by slot
    pub fn get_static_field(&self, slot: usize) -> Option<Value> {
        self.static_fields.read().get(slot).cloned()
    }

    /// Set a static field value by slot
    pub fn set_static_field(&self, slot: usize, value: Value) -> Result<(), String> {
        let mut statics = self.static_fields.write();
        let len = statics.len();
        match statics.get_mut(slot) {
            Some(field) => {
                *field = value;
                Ok(())
            }
            None => Err(format!(
                "Static field slot {} out of bounds (class has {} static fields)",
                slot, len
            )),
        }
    }

    /// Get number of static fields
    pub fn static_field_count(&self) -> usize {
        self.static_fields.read().len()
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Primitive kind, if this is a primitive type
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            ClassKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether this is a primitive type
    pub fn is_primitive(&self) -> bool {
        self.primitive_kind().is_some()
    }

    /// Package part of the name (`""` for unqualified names)
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }

    /// Name without the package
    pub fn simple_name(&self) -> &str {
        self.name.rsplit_once('.').map(|(_, simple)| simple).unwrap_or(&self.name)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("superclass", &self.superclass)
            .field("interfaces", &self.interfaces)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("field_count", &self.field_count)
            .finish_non_exhaustive()
    }
}
