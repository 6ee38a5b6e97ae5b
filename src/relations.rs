//! Type relations: implements sets and the implemented-by mapping
//!
//! A concrete type "implements" every ancestor from itself up to (and
//! excluding) the base object. The implemented-by mapping records, for each
//! such interface, the single configured type that satisfies it.

use crate::error::{InjectError, Result};
use crate::reflection::ReflectionProvider;
use crate::sorted_vec::SortedUniqueVec;
use crate::types::Type;

/// Ordered-unique set of type handles, ascending by canonical name.
pub type Types = SortedUniqueVec<Type, Type>;

/// Build a [`Types`] set from an arbitrary list of handles
pub fn make_types(items: Vec<Type>) -> Types {
    SortedUniqueVec::from_vec(|t| *t, items)
}

/// Compute the set of interfaces a type implements.
///
/// Walks the ancestor chain supplied by the reflection provider, stopping at
/// (and excluding) the base object. The base object itself implements
/// nothing; an empty handle fails with [`InjectError::EmptyType`].
pub fn extract_interfaces(reflection: &dyn ReflectionProvider, t: &Type) -> Result<Types> {
    if t.is_empty() {
        return Err(InjectError::EmptyType);
    }
    if t.is_base_object() {
        return Ok(make_types(Vec::new()));
    }

    let interfaces = reflection
        .ancestors(t)
        .into_iter()
        .filter(|ancestor| !ancestor.is_base_object())
        .collect();
    Ok(make_types(interfaces))
}

/// True iff `interface` appears in the implements set of `subtype`
pub fn implements(
    reflection: &dyn ReflectionProvider,
    subtype: &Type,
    interface: &Type,
) -> Result<bool> {
    Ok(extract_interfaces(reflection, subtype)?.contains(interface))
}

/// One "interface is implemented by type" relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplementedBy {
    interface_type: Type,
    implementation_type: Type,
}

impl ImplementedBy {
    /// Relate an interface to the configured type satisfying it
    pub fn new(interface_type: Type, implementation_type: Type) -> Self {
        Self {
            interface_type,
            implementation_type,
        }
    }

    /// The available interface
    #[inline]
    pub fn interface_type(&self) -> &Type {
        &self.interface_type
    }

    /// The configured type implementing the interface
    #[inline]
    pub fn implementation_type(&self) -> &Type {
        &self.implementation_type
    }
}

/// Mapping from interface type to its single implementation, keyed and
/// ordered by interface.
pub type ImplementedByMapping = SortedUniqueVec<Type, ImplementedBy>;

/// Create an empty implemented-by mapping
pub fn make_implemented_by_mapping() -> ImplementedByMapping {
    SortedUniqueVec::new(|relation: &ImplementedBy| *relation.interface_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::TypeRegistry;

    // Names sort in ancestry order so the set order matches the chain.
    struct AnRoot;
    struct BnMiddle;
    struct CnLeaf;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<AnRoot>();
        registry.register::<BnMiddle>().extends::<AnRoot>();
        registry.register::<CnLeaf>().extends::<BnMiddle>();
        registry
    }

    #[test]
    fn test_base_object_implements_nothing() {
        let registry = registry();
        let interfaces = extract_interfaces(&registry, &Type::base_object()).unwrap();
        assert!(interfaces.is_empty());
    }

    #[test]
    fn test_direct_successor_implements_itself() {
        let registry = registry();
        let interfaces = extract_interfaces(&registry, &Type::of::<AnRoot>()).unwrap();
        assert_eq!(interfaces, make_types(vec![Type::of::<AnRoot>()]));
    }

    #[test]
    fn test_indirect_successor_implements_two() {
        let registry = registry();
        let interfaces = extract_interfaces(&registry, &Type::of::<BnMiddle>()).unwrap();
        assert_eq!(
            interfaces.content(),
            &[Type::of::<AnRoot>(), Type::of::<BnMiddle>()]
        );
    }

    #[test]
    fn test_deep_successor_implements_three() {
        let registry = registry();
        let interfaces = extract_interfaces(&registry, &Type::of::<CnLeaf>()).unwrap();
        assert_eq!(
            interfaces.content(),
            &[
                Type::of::<AnRoot>(),
                Type::of::<BnMiddle>(),
                Type::of::<CnLeaf>(),
            ]
        );
    }

    #[test]
    fn test_empty_type_fails() {
        let registry = registry();
        assert_eq!(
            extract_interfaces(&registry, &Type::empty()),
            Err(InjectError::EmptyType)
        );
    }

    #[test]
    fn test_implements() {
        let registry = registry();
        let leaf = Type::of::<CnLeaf>();
        assert!(implements(&registry, &leaf, &Type::of::<AnRoot>()).unwrap());
        assert!(implements(&registry, &leaf, &leaf).unwrap());
        assert!(!implements(&registry, &Type::of::<AnRoot>(), &leaf).unwrap());
    }

    #[test]
    fn test_implemented_by_mapping_is_keyed_by_interface() {
        let mut mapping = make_implemented_by_mapping();
        mapping.add(ImplementedBy::new(
            Type::of::<AnRoot>(),
            Type::of::<BnMiddle>(),
        ));

        let found = mapping.get(&Type::of::<AnRoot>()).unwrap();
        assert_eq!(found.implementation_type(), &Type::of::<BnMiddle>());
        assert!(!mapping.contains(&Type::of::<CnLeaf>()));
    }
}
