//! Specula Core
//!
//! The dynamic class model that name-based member access runs against:
//! - Values, objects and classes
//! - The class registry with its builtin types
//! - Forced-access field and method primitives
//! - The reflection access policy and its TOML configuration

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod access;
pub mod builtins;
pub mod class_registry;
pub mod definition;
pub mod object;
pub mod permissions;
pub mod primitive;
pub mod value;

pub use access::{FieldHandle, MethodHandle};
pub use builtins::core_class_ids;
pub use class_registry::ClassRegistry;
pub use definition::{ClassDefinition, DefinitionKind, FieldDefinition, MethodDefinition};
pub use object::{
    Class, ClassId, ClassKind, FieldDecl, MethodDecl, Modifiers, NativeMethod, Object, ObjectRef,
    Visibility,
};
pub use permissions::{AccessPolicy, ConfigError, PackageRule, ReflectionPermission};
pub use primitive::PrimitiveKind;
pub use value::Value;

/// Host runtime errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No class with this name is registered
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Class id not issued by this registry
    #[error("No such class: {0}")]
    NoSuchClass(ClassId),

    /// Rejected class definition
    #[error("Invalid definition of {class}: {reason}")]
    InvalidDefinition {
        /// Class being defined
        class: String,
        /// What is wrong with it
        reason: String,
    },

    /// Access to a non-public member without forcing it accessible, or a
    /// write to a static final field
    #[error("Illegal access to {class}.{member}: {reason}")]
    IllegalAccess {
        /// Declaring class
        class: String,
        /// Member name
        member: String,
        /// Reason
        reason: String,
    },

    /// The member lives in a sealed package and cannot be made accessible
    #[error("Unable to make {class}.{member} accessible: package {package} is sealed")]
    InaccessibleObject {
        /// Declaring class
        class: String,
        /// Member name
        member: String,
        /// Sealed package
        package: String,
    },

    /// The access policy denies the operation
    #[error("Permission denied: cannot {action} {class}.{member}")]
    AccessDenied {
        /// Declaring class
        class: String,
        /// Member name
        member: String,
        /// Attempted action (`read`, `write` or `invoke`)
        action: &'static str,
    },

    /// Wrong receiver class, argument count or value type
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Instance member used without a receiver
    #[error("Null pointer exception: {0}")]
    NullPointer(String),

    /// The class cannot be instantiated
    #[error("Instantiation failed: {0}")]
    Instantiation(String),

    /// A method body failed
    #[error("Exception in {method}: {source}")]
    InvocationTarget {
        /// Invoked method (`Class.name`)
        method: String,
        /// Error raised by the method body
        #[source]
        source: Box<HostError>,
    },

    /// Error raised by method code
    #[error("{0}")]
    Thrown(String),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Host runtime result
pub type HostResult<T> = Result<T, HostError>;
