//! Class registry for runtime class metadata

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::builtins::{self, core_class_ids};
use crate::definition::{ClassDefinition, DefinitionKind};
use crate::object::{Class, ClassId, ClassKind, FieldDecl, MethodDecl, Object};
use crate::permissions::AccessPolicy;
use crate::primitive::PrimitiveKind;
use crate::value::Value;
use crate::{HostError, HostResult};

/// Registry of every class known to the host
///
/// Builtin classes are registered on construction at the ids listed in
/// [`core_class_ids`]; user classes follow in definition order.
#[derive(Debug)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
    /// Policy consulted by forced member access
    policy: AccessPolicy,
}

impl ClassRegistry {
    /// Create a registry holding only the builtin classes
    pub fn new() -> Self {
        Self::with_policy(AccessPolicy::default())
    }

    /// Create a registry with an explicit access policy
    pub fn with_policy(policy: AccessPolicy) -> Self {
        let mut registry = Self {
            classes: Vec::with_capacity(core_class_ids::BUILTIN_COUNT),
            name_to_id: FxHashMap::default(),
            policy,
        };
        builtins::bootstrap(&mut registry);
        registry
    }

    /// Access policy in effect
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Replace the access policy
    pub fn set_policy(&mut self, policy: AccessPolicy) {
        self.policy = policy;
    }

    pub(crate) fn insert_class(&mut self, class: Class) -> ClassId {
        let id = class.id;
        debug_assert_eq!(id, self.next_class_id());

        self.name_to_id.insert(class.name.clone(), id);
        self.classes.push(class);

        id
    }

    /// Register a user class
    pub fn define(&mut self, def: ClassDefinition) -> HostResult<ClassId> {
        let id = self.next_class_id();
        let invalid = |reason: String| HostError::InvalidDefinition {
            class: def.name.clone(),
            reason,
        };

        if def.name.is_empty() {
            return Err(invalid("class name is empty".to_string()));
        }
        if self.name_to_id.contains_key(&def.name) {
            return Err(invalid("a class with this name is already defined".to_string()));
        }

        let (kind, superclass) = match def.kind {
            DefinitionKind::Interface => {
                if def.superclass.is_some() {
                    return Err(invalid("an interface cannot extend a class".to_string()));
                }
                (ClassKind::Interface, None)
            }
            DefinitionKind::Class => {
                let parent = def.superclass.unwrap_or(core_class_ids::OBJECT);
                match self.get_class(parent).map(|c| c.kind) {
                    Some(ClassKind::Class) => {}
                    Some(_) => {
                        return Err(invalid(format!(
                            "{} cannot be used as a superclass",
                            self.class_name(parent)
                        )))
                    }
                    None => return Err(invalid(format!("unknown superclass {}", parent))),
                }
                (ClassKind::Class, Some(parent))
            }
        };

        for &interface in &def.interfaces {
            match self.get_class(interface) {
                Some(class) if class.is_interface() => {}
                Some(class) => {
                    return Err(invalid(format!("{} is not an interface", class.name)));
                }
                None => return Err(invalid(format!("unknown interface {}", interface))),
            }
        }

        let mut class = Class::new(id, def.name.clone(), kind);
        class.superclass = superclass;
        class.interfaces = def.interfaces.clone();
        if let Some(parent) = superclass.and_then(|p| self.get_class(p)) {
            class.instance_template = parent.instance_template.clone();
            class.field_count = parent.field_count;
        }

        let known = |ty: ClassId| ty == id || self.get_class(ty).is_some();

        for field in &def.fields {
            if class.declared_field(&field.name).is_some() {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
            if !known(field.ty) || field.ty == core_class_ids::VOID {
                return Err(invalid(format!("field '{}' has an invalid type", field.name)));
            }
            if kind == ClassKind::Interface && !field.modifiers.is_static {
                return Err(invalid(format!(
                    "interface field '{}' must be static",
                    field.name
                )));
            }

            let initial = match &field.initial_value {
                Some(value) => self.coerce(value.clone(), field.ty).map_err(|e| {
                    invalid(format!("bad initial value for '{}': {}", field.name, e))
                })?,
                None => PrimitiveKind::from_class_id(field.ty)
                    .map(PrimitiveKind::default_value)
                    .unwrap_or_default(),
            };

            let slot = if field.modifiers.is_static {
                class.static_field_count()
            } else {
                class.field_count
            };

            class.add_field(
                FieldDecl {
                    name: field.name.clone(),
                    ty: field.ty,
                    modifiers: field.modifiers,
                    slot,
                },
                initial,
            );
        }

        for method in &def.methods {
            if class.declared_method(&method.name, &method.params).is_some() {
                return Err(invalid(format!(
                    "duplicate method '{}' with the same parameter types",
                    method.name
                )));
            }
            if !known(method.return_type)
                || method.params.iter().any(|&p| !known(p) || p == core_class_ids::VOID)
            {
                return Err(invalid(format!(
                    "method '{}' has an invalid signature",
                    method.name
                )));
            }

            class.add_method(MethodDecl {
                name: method.name.clone(),
                params: method.params.clone(),
                return_type: method.return_type,
                modifiers: method.modifiers,
                body: Arc::clone(&method.body),
            });
        }

        Ok(self.insert_class(class))
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id.index())
    }

    /// Get class by ID, failing for ids this registry never issued
    pub fn class(&self, id: ClassId) -> HostResult<&Class> {
        self.get_class(id).ok_or(HostError::NoSuchClass(id))
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.get_class(*id))
    }

    /// Resolve a fully qualified class name
    pub fn for_name(&self, name: &str) -> HostResult<ClassId> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| HostError::ClassNotFound(name.to_string()))
    }

    /// Name of a class, `"?"` for unknown ids
    pub fn class_name(&self, id: ClassId) -> &str {
        self.get_class(id).map(|c| c.name.as_str()).unwrap_or("?")
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        ClassId(self.classes.len() as u32)
    }

    /// Number of registered classes (builtins included)
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the registry is empty (only before bootstrap)
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes
    pub fn iter(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    /// Superclass of a class
    pub fn superclass(&self, id: ClassId) -> Option<ClassId> {
        self.get_class(id).and_then(|c| c.superclass)
    }

    /// The class itself followed by its superclasses up to the root
    pub fn ancestors(&self, id: ClassId) -> impl Iterator<Item = &Class> + '_ {
        std::iter::successors(self.get_class(id), move |class| {
            class.superclass.and_then(|parent| self.get_class(parent))
        })
    }

    /// Check whether `sub` is `sup`, one of its subclasses or one of its
    /// implementors
    ///
    /// Every class and interface is a subtype of `Object`; primitives and
    /// `void` only of themselves.
    pub fn is_subclass_of(&self, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup {
            return true;
        }
        let Some(class) = self.get_class(sub) else {
            return false;
        };
        if sup == core_class_ids::OBJECT {
            return matches!(class.kind, ClassKind::Class | ClassKind::Interface);
        }

        let mut seen = FxHashSet::default();
        let mut pending = vec![class];
        while let Some(current) = pending.pop() {
            if !seen.insert(current.id) {
                continue;
            }
            let supertypes = current.superclass.iter().chain(current.interfaces.iter());
            for &parent in supertypes {
                if parent == sup {
                    return true;
                }
                if let Some(parent) = self.get_class(parent) {
                    pending.push(parent);
                }
            }
        }
        false
    }

    /// Check whether a value is an instance of a class
    pub fn is_instance(&self, value: &Value, id: ClassId) -> bool {
        value
            .runtime_class()
            .is_some_and(|class| self.is_subclass_of(class, id))
    }

    /// Create a new instance with every slot set to its initial value
    pub fn instantiate(&self, id: ClassId) -> HostResult<Value> {
        let class = self.class(id)?;

        let value_class = id == core_class_ids::STRING
            || id == core_class_ids::CLASS
            || PrimitiveKind::from_boxed_class_id(id).is_some();
        if class.kind != ClassKind::Class || value_class {
            return Err(HostError::Instantiation(format!(
                "{} cannot be instantiated",
                class.name
            )));
        }

        let object = Object::new(id, class.instance_template.clone());
        Ok(Value::Object(Arc::new(object)))
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FieldDefinition, MethodDefinition};

    fn define_point(registry: &mut ClassRegistry) -> ClassId {
        registry
            .define(
                ClassDefinition::new("geo.Point")
                    .field(FieldDefinition::new("x", core_class_ids::INT).private())
                    .field(FieldDefinition::new("y", core_class_ids::INT).private().initial_value(4i32))
                    .field(
                        FieldDefinition::new("COUNT", core_class_ids::LONG)
                            .public()
                            .as_static(),
                    ),
            )
            .unwrap()
    }

    #[test]
    fn test_define_class() {
        let mut registry = ClassRegistry::new();
        let id = define_point(&mut registry);

        assert_eq!(id.index(), core_class_ids::BUILTIN_COUNT);
        assert_eq!(registry.for_name("geo.Point").unwrap(), id);

        let class = registry.get_class(id).unwrap();
        assert_eq!(class.superclass, Some(core_class_ids::OBJECT));
        assert_eq!(class.field_count, 2);
        assert_eq!(class.static_field_count(), 1);
        assert_eq!(class.get_static_field(0), Some(Value::Long(0)));
        assert_eq!(registry.next_class_id().index(), core_class_ids::BUILTIN_COUNT + 1);
    }

    #[test]
    fn test_for_name_missing() {
        let registry = ClassRegistry::new();
        assert!(matches!(
            registry.for_name("geo.Missing"),
            Err(HostError::ClassNotFound(name)) if name == "geo.Missing"
        ));
        assert_eq!(registry.for_name("String").unwrap(), core_class_ids::STRING);
    }

    #[test]
    fn test_inherited_slot_layout() {
        let mut registry = ClassRegistry::new();
        let point = define_point(&mut registry);
        let point3 = registry
            .define(
                ClassDefinition::new("geo.Point3")
                    .extends(point)
                    .field(FieldDefinition::new("x", core_class_ids::STRING))
                    .field(FieldDefinition::new("z", core_class_ids::INT)),
            )
            .unwrap();

        let class = registry.get_class(point3).unwrap();
        assert_eq!(class.field_count, 4);
        assert_eq!(class.declared_field("x").unwrap().1.slot, 2);
        assert_eq!(class.declared_field("z").unwrap().1.slot, 3);

        let value = registry.instantiate(point3).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.field_count(), 4);
        assert_eq!(object.get_field(0), Some(Value::Int(0)));
        assert_eq!(object.get_field(1), Some(Value::Int(4)));
        assert_eq!(object.get_field(2), Some(Value::Null));
    }

    #[test]
    fn test_define_rejects_invalid() {
        let mut registry = ClassRegistry::new();
        define_point(&mut registry);
        let shape = registry.define(ClassDefinition::interface("geo.Shape")).unwrap();

        let duplicate_class = registry.define(ClassDefinition::new("geo.Point"));
        assert!(matches!(duplicate_class, Err(HostError::InvalidDefinition { .. })));

        let duplicate_field = registry.define(
            ClassDefinition::new("geo.A")
                .field(FieldDefinition::new("a", core_class_ids::INT))
                .field(FieldDefinition::new("a", core_class_ids::LONG)),
        );
        assert!(matches!(duplicate_field, Err(HostError::InvalidDefinition { .. })));

        let duplicate_method = registry.define(
            ClassDefinition::new("geo.B")
                .method(MethodDefinition::new("f", |_, _, _| Ok(Value::Null)).param(core_class_ids::INT))
                .method(MethodDefinition::new("f", |_, _, _| Ok(Value::Null)).param(core_class_ids::INT)),
        );
        assert!(matches!(duplicate_method, Err(HostError::InvalidDefinition { .. })));

        let interface_parent = registry.define(ClassDefinition::new("geo.C").extends(shape));
        assert!(matches!(interface_parent, Err(HostError::InvalidDefinition { .. })));

        let primitive_parent =
            registry.define(ClassDefinition::new("geo.D").extends(core_class_ids::INT));
        assert!(matches!(primitive_parent, Err(HostError::InvalidDefinition { .. })));

        let class_as_interface = registry.define(
            ClassDefinition::new("geo.E").implements(core_class_ids::STRING),
        );
        assert!(matches!(class_as_interface, Err(HostError::InvalidDefinition { .. })));

        let instance_field_on_interface = registry.define(
            ClassDefinition::interface("geo.F").field(FieldDefinition::new("a", core_class_ids::INT)),
        );
        assert!(matches!(instance_field_on_interface, Err(HostError::InvalidDefinition { .. })));

        let bad_initial = registry.define(
            ClassDefinition::new("geo.G")
                .field(FieldDefinition::new("a", core_class_ids::INT).initial_value("nope")),
        );
        assert!(matches!(bad_initial, Err(HostError::InvalidDefinition { .. })));

        // failed definitions leave no trace
        assert!(registry.get_class_by_name("geo.G").is_none());
        assert_eq!(registry.len(), core_class_ids::BUILTIN_COUNT + 2);
    }

    #[test]
    fn test_self_referencing_signature() {
        let mut registry = ClassRegistry::new();
        let id = registry.next_class_id();
        let node = registry
            .define(
                ClassDefinition::new("list.Node")
                    .field(FieldDefinition::new("next", id))
                    .method(
                        MethodDefinition::new("link", |_, _, _| Ok(Value::Null))
                            .param(id)
                            .returns(id),
                    ),
            )
            .unwrap();

        assert_eq!(node, id);
        let class = registry.get_class(node).unwrap();
        assert!(class.declared_method("link", &[node]).is_some());
    }

    #[test]
    fn test_subclass_and_interfaces() {
        let mut registry = ClassRegistry::new();
        let shape = registry.define(ClassDefinition::interface("geo.Shape")).unwrap();
        let solid = registry
            .define(ClassDefinition::interface("geo.Solid").implements(shape))
            .unwrap();
        let point = define_point(&mut registry);
        let cube = registry
            .define(ClassDefinition::new("geo.Cube").extends(point).implements(solid))
            .unwrap();

        assert!(registry.is_subclass_of(cube, point));
        assert!(registry.is_subclass_of(cube, solid));
        assert!(registry.is_subclass_of(cube, shape));
        assert!(registry.is_subclass_of(solid, core_class_ids::OBJECT));
        assert!(!registry.is_subclass_of(point, cube));
        assert!(!registry.is_subclass_of(point, shape));
        assert!(!registry.is_subclass_of(core_class_ids::INT, core_class_ids::OBJECT));

        let names: Vec<&str> = registry.ancestors(cube).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["geo.Cube", "geo.Point", "Object"]);
    }

    #[test]
    fn test_is_instance() {
        let mut registry = ClassRegistry::new();
        let point = define_point(&mut registry);
        let value = registry.instantiate(point).unwrap();

        assert!(registry.is_instance(&value, point));
        assert!(registry.is_instance(&value, core_class_ids::OBJECT));
        assert!(registry.is_instance(&Value::Int(1), core_class_ids::BOXED_INT));
        assert!(!registry.is_instance(&Value::Int(1), core_class_ids::INT));
        assert!(!registry.is_instance(&Value::Null, core_class_ids::OBJECT));
    }

    #[test]
    fn test_instantiate_rejects_non_classes() {
        let mut registry = ClassRegistry::new();
        let shape = registry.define(ClassDefinition::interface("geo.Shape")).unwrap();

        for id in [shape, core_class_ids::INT, core_class_ids::VOID, core_class_ids::STRING] {
            assert!(matches!(registry.instantiate(id), Err(HostError::Instantiation(_))));
        }
        assert!(registry.instantiate(core_class_ids::OBJECT).is_ok());
        assert!(matches!(
            registry.instantiate(ClassId(999)),
            Err(HostError::NoSuchClass(_))
        ));
    }
}
