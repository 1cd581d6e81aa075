//! Primitive/boxed type equivalence

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use specula_core::{ClassId, PrimitiveKind};

/// Bidirectional mapping between each primitive class and its boxed class
#[derive(Debug)]
pub struct WrapperTable {
    to_boxed: FxHashMap<ClassId, ClassId>,
    to_primitive: FxHashMap<ClassId, ClassId>,
}

impl WrapperTable {
    fn build() -> Self {
        let mut to_boxed = FxHashMap::default();
        let mut to_primitive = FxHashMap::default();

        for kind in PrimitiveKind::ALL {
            let previous = to_boxed.insert(kind.class_id(), kind.boxed_class_id());
            debug_assert!(previous.is_none());
            let previous = to_primitive.insert(kind.boxed_class_id(), kind.class_id());
            debug_assert!(previous.is_none());
        }

        Self {
            to_boxed,
            to_primitive,
        }
    }

    /// Boxed class of a primitive class
    pub fn boxed(&self, primitive: ClassId) -> Option<ClassId> {
        self.to_boxed.get(&primitive).copied()
    }

    /// Primitive class of a boxed class
    pub fn primitive(&self, boxed: ClassId) -> Option<ClassId> {
        self.to_primitive.get(&boxed).copied()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.to_boxed.len()
    }

    /// Always false once built
    pub fn is_empty(&self) -> bool {
        self.to_boxed.is_empty()
    }

    /// Iterate over `(primitive, boxed)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, ClassId)> + '_ {
        self.to_boxed.iter().map(|(p, b)| (*p, *b))
    }
}

/// Process-wide wrapper table
///
/// Builtin class ids are identical in every registry, so one table serves
/// all of them.
pub static WRAPPERS: Lazy<WrapperTable> = Lazy::new(WrapperTable::build);

/// Whether two types are the same once primitives are replaced by their
/// boxed classes
pub fn compare_types(left: ClassId, right: ClassId) -> bool {
    let left = WRAPPERS.boxed(left).unwrap_or(left);
    let right = WRAPPERS.boxed(right).unwrap_or(right);
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;
    use specula_core::core_class_ids;

    #[test]
    fn test_wrapper_table_is_a_bijection() {
        assert_eq!(WRAPPERS.len(), 8);

        let boxed: FxHashSet<ClassId> = WRAPPERS.iter().map(|(_, b)| b).collect();
        assert_eq!(boxed.len(), 8);

        for (primitive, boxed) in WRAPPERS.iter() {
            assert_eq!(WRAPPERS.primitive(boxed), Some(primitive));
        }
        assert_eq!(WRAPPERS.boxed(core_class_ids::STRING), None);
    }

    #[test]
    fn test_compare_types() {
        assert!(compare_types(core_class_ids::INT, core_class_ids::BOXED_INT));
        assert!(compare_types(core_class_ids::BOXED_INT, core_class_ids::INT));
        assert!(compare_types(core_class_ids::CHAR, core_class_ids::CHAR));
        assert!(!compare_types(core_class_ids::INT, core_class_ids::BOXED_LONG));
        assert!(!compare_types(core_class_ids::INT, core_class_ids::LONG));
        assert!(compare_types(core_class_ids::STRING, core_class_ids::STRING));
        assert!(!compare_types(core_class_ids::STRING, core_class_ids::OBJECT));
    }
}
