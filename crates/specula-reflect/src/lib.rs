//! Specula Reflect
//!
//! Name-based member access over the Specula class model. Given an object
//! and a list of candidate field or method names, it finds the member in the
//! object's superclass chain, ignoring declared visibility, and reads,
//! writes or invokes it.
//!
//! Call arguments can carry an explicit static type through [`Arg`], which
//! is how `int` and `long` overloads (or a null of a given type) are told
//! apart.
//!
//! ```ignore
//! use specula_reflect::{call_instance, get_instance_property, Arg};
//!
//! let name = get_instance_property(&registry, &player, &["displayName", "name"])?;
//! call_instance(&registry, &player, &["heal"], vec![Arg::int(5)])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod accessor;
pub mod equivalence;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod wrapper;

pub use accessor::{
    call, call_instance, call_static, get_instance_property, get_property, get_property_by_name,
    set_instance_property, set_property, set_property_by_name,
};
pub use equivalence::{compare_types, WrapperTable, WRAPPERS};
pub use error::{ReflectError, ReflectResult};
pub use loader::{get_class, safe_load, SafeClassLoad};
pub use resolver::{
    argument_types, get_all_interfaces, get_all_methods, get_declared_method, get_field,
    get_method, get_method_by_types,
};
pub use wrapper::{Arg, PrimitiveArg};
