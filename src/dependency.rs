//! Dependency extraction from injection points
//!
//! For each configured type, every injection point becomes one
//! [`Dependency`]: the required type plus the setter that will receive it.
//! Extraction validates the shape of each dependency up front so resolution
//! never has to guess.

use crate::error::{InjectError, Result};
use crate::reflection::{ReflectionProvider, SetterMethod};
use crate::relations::extract_interfaces;
use crate::sorted_vec::SortedUniqueVec;
use crate::types::Type;

/// One required-type-at-one-injection-point relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    required_type: Type,
    setter: SetterMethod,
}

impl Dependency {
    pub(crate) fn new(required_type: Type, setter: SetterMethod) -> Self {
        Self {
            required_type,
            setter,
        }
    }

    /// The type this dependency must be satisfied with
    #[inline]
    pub fn required_type(&self) -> &Type {
        &self.required_type
    }

    /// The injection point receiving the resolved instance
    #[inline]
    pub fn setter(&self) -> &SetterMethod {
        &self.setter
    }
}

/// All dependencies of one type, unique by required type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDependencies {
    declaring_type: Type,
    dependencies: SortedUniqueVec<Type, Dependency>,
}

impl TypeDependencies {
    /// The type declaring these injection points
    #[inline]
    pub fn declaring_type(&self) -> &Type {
        &self.declaring_type
    }

    /// Dependencies in ascending required-type order
    #[inline]
    pub fn dependencies(&self) -> &[Dependency] {
        self.dependencies.content()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Scan the injection points of `t` and build its dependency set.
///
/// Fails with [`InjectError::InvalidSetter`] for an empty or base-object
/// parameter, [`InjectError::DependencyOnSelf`] /
/// [`InjectError::DependencyOnSupertype`] /
/// [`InjectError::DependencyOnSubtype`] when the required type is related to
/// `t` by inheritance, and [`InjectError::DependencyDuplicated`] when two
/// injection points request the same required type.
pub fn extract_dependencies(
    reflection: &dyn ReflectionProvider,
    t: &Type,
) -> Result<TypeDependencies> {
    let own_interfaces = extract_interfaces(reflection, t)?;
    let mut dependencies: SortedUniqueVec<Type, Dependency> =
        SortedUniqueVec::new(|d: &Dependency| *d.required_type());

    for setter in reflection.injection_points(t) {
        let required = *setter.param_type();
        if !required.is_valid() {
            return Err(InjectError::InvalidSetter {
                type_name: t.display_name(),
                setter: setter.name(),
            });
        }
        if required == *t {
            return Err(InjectError::DependencyOnSelf {
                type_name: t.display_name(),
            });
        }
        // required ∈ interfaces(t) means t descends from required.
        if own_interfaces.contains(&required) {
            return Err(InjectError::DependencyOnSupertype {
                type_name: t.display_name(),
                required: required.display_name(),
            });
        }
        if extract_interfaces(reflection, &required)?.contains(t) {
            return Err(InjectError::DependencyOnSubtype {
                type_name: t.display_name(),
                required: required.display_name(),
            });
        }
        if dependencies.contains(&required) {
            return Err(InjectError::DependencyDuplicated {
                type_name: t.display_name(),
                required: required.display_name(),
            });
        }
        dependencies.add(Dependency::new(required, setter));
    }

    Ok(TypeDependencies {
        declaring_type: *t,
        dependencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::TypeRegistry;

    struct Service;
    struct SubService;
    struct Consumer;

    #[test]
    fn test_no_injection_points_yields_empty_set() {
        let mut registry = TypeRegistry::new();
        registry.register::<Consumer>();
        registry.register::<Service>();

        let deps = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap();
        assert!(deps.is_empty());
        assert_eq!(deps.declaring_type(), &Type::of::<Consumer>());
    }

    #[test]
    fn test_single_dependency() {
        let mut registry = TypeRegistry::new();
        registry.register::<Service>();
        registry
            .register::<Consumer>()
            .with_setter::<Service, _>("set_service", |_, _| true);

        let deps = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap();
        assert_eq!(deps.dependencies().len(), 1);
        assert_eq!(
            deps.dependencies()[0].required_type(),
            &Type::of::<Service>()
        );
        assert_eq!(deps.dependencies()[0].setter().name(), "set_service");
    }

    #[test]
    fn test_inherited_injection_points_are_collected() {
        struct Base;

        let mut registry = TypeRegistry::new();
        registry.register::<Service>();
        registry
            .register::<Base>()
            .with_setter::<Service, _>("set_service", |_, _| true);
        registry.register::<Consumer>().extends::<Base>();

        let deps = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap();
        assert_eq!(deps.dependencies().len(), 1);
    }

    #[test]
    fn test_dependency_on_self_fails() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Consumer>()
            .with_setter::<Consumer, _>("set_self", |_, _| true);

        let err = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap_err();
        assert!(matches!(err, InjectError::DependencyOnSelf { .. }));
    }

    #[test]
    fn test_dependency_on_supertype_fails() {
        let mut registry = TypeRegistry::new();
        registry.register::<Service>();
        registry
            .register::<SubService>()
            .extends::<Service>()
            .with_setter::<Service, _>("set_parent", |_, _| true);

        let err = extract_dependencies(&registry, &Type::of::<SubService>()).unwrap_err();
        assert!(matches!(err, InjectError::DependencyOnSupertype { .. }));
    }

    #[test]
    fn test_dependency_on_subtype_fails() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Service>()
            .with_setter::<SubService, _>("set_child", |_, _| true);
        registry.register::<SubService>().extends::<Service>();

        let err = extract_dependencies(&registry, &Type::of::<Service>()).unwrap_err();
        assert!(matches!(err, InjectError::DependencyOnSubtype { .. }));
    }

    #[test]
    fn test_duplicated_dependency_fails() {
        let mut registry = TypeRegistry::new();
        registry.register::<Service>();
        registry
            .register::<Consumer>()
            .with_setter::<Service, _>("set_first", |_, _| true)
            .with_setter::<Service, _>("set_second", |_, _| true);

        let err = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap_err();
        assert!(matches!(err, InjectError::DependencyDuplicated { .. }));
    }

    #[test]
    fn test_base_object_parameter_fails() {
        use crate::types::BaseObject;

        let mut registry = TypeRegistry::new();
        registry
            .register::<Consumer>()
            .with_setter::<BaseObject, _>("set_object", |_, _| true);

        let err = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap_err();
        assert!(matches!(err, InjectError::InvalidSetter { .. }));
    }

    #[test]
    fn test_empty_parameter_fails() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Consumer>()
            .with_setter_raw("set_unknown", Type::empty(), |_, _| true);

        let err = extract_dependencies(&registry, &Type::of::<Consumer>()).unwrap_err();
        assert!(matches!(err, InjectError::InvalidSetter { .. }));
    }
}
