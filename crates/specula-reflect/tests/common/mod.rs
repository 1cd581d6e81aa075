//! Shared fixtures for the integration tests
//!
//! The zoo hierarchy:
//!
//! ```text
//! interface zoo.Named        interface zoo.Fed
//! zoo.Animal  implements Named   { private String name; private int legs = 4; ... }
//! zoo.Mammal  extends Animal implements Fed { private boolean furry; ... }
//! zoo.Dog     extends Mammal implements Named { private String name; String tail; ... }
//! ```
//!
//! `f` is overloaded once per level: `Animal.f(String)`, `Mammal.f(int)`,
//! `Dog.f(long)`. Every method body returns a label naming the overload.

#![allow(dead_code)]

use specula_core::{
    core_class_ids, AccessPolicy, ClassDefinition, ClassId, ClassRegistry, FieldDefinition,
    HostError, MethodDefinition, Value,
};

pub struct Zoo {
    pub registry: ClassRegistry,
    pub named: ClassId,
    pub fed: ClassId,
    pub animal: ClassId,
    pub mammal: ClassId,
    pub dog: ClassId,
}

impl Zoo {
    pub fn new_dog(&self) -> Value {
        self.registry.instantiate(self.dog).unwrap()
    }

    pub fn new_animal(&self) -> Value {
        self.registry.instantiate(self.animal).unwrap()
    }
}

/// Method returning a fixed label
pub fn labeled(name: &str, label: &'static str) -> MethodDefinition {
    MethodDefinition::new(name, move |_, _, _| Ok(Value::from(label)))
        .returns(core_class_ids::STRING)
}

pub fn zoo() -> Zoo {
    zoo_with_policy(AccessPolicy::new())
}

pub fn zoo_with_policy(policy: AccessPolicy) -> Zoo {
    let mut registry = ClassRegistry::with_policy(policy);

    let named = registry.define(ClassDefinition::interface("zoo.Named")).unwrap();
    let fed = registry.define(ClassDefinition::interface("zoo.Fed")).unwrap();

    let animal = registry
        .define(
            ClassDefinition::new("zoo.Animal")
                .implements(named)
                .field(FieldDefinition::new("name", core_class_ids::STRING).private())
                .field(
                    FieldDefinition::new("legs", core_class_ids::INT)
                        .private()
                        .initial_value(4i32),
                )
                .static_field(
                    FieldDefinition::new("population", core_class_ids::LONG).protected(),
                )
                .static_field(
                    FieldDefinition::new("KINGDOM", core_class_ids::STRING)
                        .public()
                        .as_final()
                        .initial_value("Animalia"),
                )
                .method(labeled("f", "Animal.f(String)").param(core_class_ids::STRING).public())
                .method(
                    MethodDefinition::new("bite", |_, _, _| {
                        Err(HostError::Thrown("ouch".to_string()))
                    })
                    .public(),
                ),
        )
        .unwrap();

    let mammal = registry
        .define(
            ClassDefinition::new("zoo.Mammal")
                .extends(animal)
                .implements(fed)
                .field(FieldDefinition::new("furry", core_class_ids::BOOLEAN).private())
                .method(labeled("f", "Mammal.f(int)").param(core_class_ids::INT).public())
                .method(labeled("feed", "feed(int)").param(core_class_ids::INT).private())
                .method(labeled("feed", "feed(long)").param(core_class_ids::LONG).private())
                .method(labeled("greet", "greet(String)").param(core_class_ids::STRING))
                .method(labeled("greet", "greet(Object)").param(core_class_ids::OBJECT)),
        )
        .unwrap();

    let dog_id = registry.next_class_id();
    let dog = registry
        .define(
            ClassDefinition::new("zoo.Dog")
                .extends(mammal)
                .implements(named)
                .field(FieldDefinition::new("name", core_class_ids::STRING).private())
                .field(FieldDefinition::new("tail", core_class_ids::STRING).initial_value("short"))
                .method(labeled("f", "Dog.f(long)").param(core_class_ids::LONG).protected())
                .method(
                    MethodDefinition::new("legCount", |registry, this, _| {
                        let animal = registry.for_name("zoo.Animal")?;
                        let mut legs = registry
                            .field_handle(animal, "legs")
                            .ok_or_else(|| HostError::RuntimeError("no legs".to_string()))?;
                        legs.set_accessible(registry, true)?;
                        registry.field_get(&legs, this)
                    })
                    .returns(core_class_ids::INT)
                    .private(),
                )
                .static_method(
                    MethodDefinition::new("named", |registry, _, args| {
                        let dog = registry.instantiate(registry.for_name("zoo.Dog")?)?;
                        let mut name = registry
                            .field_handle(registry.for_name("zoo.Dog")?, "name")
                            .ok_or_else(|| HostError::RuntimeError("no name".to_string()))?;
                        name.set_accessible(registry, true)?;
                        registry.field_set(&name, Some(&dog), args[0].clone())?;
                        Ok(dog)
                    })
                    .param(core_class_ids::STRING)
                    .returns(dog_id)
                    .private(),
                ),
        )
        .unwrap();

    Zoo {
        registry,
        named,
        fed,
        animal,
        mammal,
        dog,
    }
}
