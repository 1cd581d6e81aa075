//! Class lookup by name

use once_cell::sync::OnceCell;
use specula_core::{ClassId, ClassRegistry};
use tracing::debug;

use crate::error::ReflectResult;

/// Resolve a fully qualified class name
///
/// An empty name yields `Ok(None)`; an unknown name is a host error.
pub fn get_class(registry: &ClassRegistry, name: &str) -> ReflectResult<Option<ClassId>> {
    if name.is_empty() {
        return Ok(None);
    }
    Ok(Some(registry.for_name(name)?))
}

/// Deferred class lookup
///
/// Holds a class name and resolves it on demand. A successful lookup is
/// kept, so the handle keeps pointing at the class of the first registry
/// that knew it; a failed lookup is retried next time.
#[derive(Debug)]
pub struct SafeClassLoad {
    name: String,
    resolved: OnceCell<ClassId>,
}

impl SafeClassLoad {
    /// Create a handle for a class name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved: OnceCell::new(),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the class, failing when it is not registered
    pub fn load(&self, registry: &ClassRegistry) -> ReflectResult<ClassId> {
        let id = self
            .resolved
            .get_or_try_init(|| registry.for_name(&self.name))?;
        Ok(*id)
    }

    /// Resolve the class, tolerating absence
    pub fn get(&self, registry: &ClassRegistry) -> Option<ClassId> {
        match self.load(registry) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(class = %self.name, error = %err, "optional class not available");
                None
            }
        }
    }

    /// Whether the class can be resolved now
    pub fn try_load(&self, registry: &ClassRegistry) -> bool {
        self.get(registry).is_some()
    }

    /// Whether the class has already been resolved
    pub fn is_loaded(&self) -> bool {
        self.resolved.get().is_some()
    }
}

/// Create a deferred lookup for a class name
pub fn safe_load(name: impl Into<String>) -> SafeClassLoad {
    SafeClassLoad::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReflectError;
    use specula_core::{core_class_ids, ClassDefinition, HostError};

    #[test]
    fn test_get_class() {
        let registry = ClassRegistry::new();

        assert_eq!(get_class(&registry, "").unwrap(), None);
        assert_eq!(get_class(&registry, "String").unwrap(), Some(core_class_ids::STRING));
        assert!(matches!(
            get_class(&registry, "no.Such"),
            Err(ReflectError::Host(HostError::ClassNotFound(_)))
        ));
    }

    #[test]
    fn test_safe_load_tolerates_absence() {
        let mut registry = ClassRegistry::new();
        let handle = safe_load("plugin.Extra");

        assert_eq!(handle.name(), "plugin.Extra");
        assert!(!handle.try_load(&registry));
        assert_eq!(handle.get(&registry), None);
        assert!(handle.load(&registry).is_err());
        assert!(!handle.is_loaded());

        let id = registry.define(ClassDefinition::new("plugin.Extra")).unwrap();
        assert!(handle.try_load(&registry));
        assert_eq!(handle.load(&registry).unwrap(), id);
        assert!(handle.is_loaded());
    }
}
