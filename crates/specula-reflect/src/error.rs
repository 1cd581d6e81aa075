//! Reflection errors

use specula_core::HostError;

/// Errors raised by name-based member access
///
/// Either a precondition failure (nothing matched, or the arguments cannot
/// be typed) or a failure of the host runtime, passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
    /// No field matched any of the candidate names
    #[error("Fields {0:?} not found")]
    FieldNotFound(Vec<String>),

    /// No method matched any of the candidate names and the argument types
    #[error("Method {0:?} not found")]
    MethodNotFound(Vec<String>),

    /// An argument is a bare null, so its static type is unknown
    #[error("No nulls allowed, use wrapper types (argument {index})")]
    NullArgument {
        /// Position of the offending argument
        index: usize,
    },

    /// The class should be inferred from the instance, but the instance is
    /// null
    #[error("Cannot infer a class from a null instance")]
    NullInstance,

    /// The host runtime refused or failed the operation
    #[error("{0}")]
    Host(#[from] HostError),
}

impl ReflectError {
    pub(crate) fn field_not_found(names: &[&str]) -> Self {
        ReflectError::FieldNotFound(names.iter().map(|n| n.to_string()).collect())
    }

    pub(crate) fn method_not_found(names: &[&str]) -> Self {
        ReflectError::MethodNotFound(names.iter().map(|n| n.to_string()).collect())
    }

    /// Whether this is a precondition failure rather than a host failure
    pub fn is_precondition(&self) -> bool {
        !matches!(self, ReflectError::Host(_))
    }

    /// The underlying host error, if any
    pub fn host_error(&self) -> Option<&HostError> {
        match self {
            ReflectError::Host(err) => Some(err),
            _ => None,
        }
    }
}

/// Reflection result
pub type ReflectResult<T> = Result<T, ReflectError>;
