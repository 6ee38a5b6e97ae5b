//! Instance providers
//!
//! A [`Provider`] is a strategy producing one instance of one type: a
//! pre-existing ready object, a default constructor, or a factory method
//! invoked on an already-resolved instance of its enclosing type. The set of
//! strategies is closed, so the instantiation phase matches exhaustively.

use tracing::trace;

use crate::error::{InjectError, Result};
use crate::reflection::{ConstructorMethod, FactoryMethod, Instance, ReflectionProvider};
use crate::relations::extract_interfaces;
use crate::types::Type;

/// A caller-supplied, pre-existing instance.
#[derive(Clone)]
pub struct ReadyProvider {
    provided_type: Type,
    instance: Instance,
}

impl std::fmt::Debug for ReadyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyProvider")
            .field("provided_type", &self.provided_type)
            .finish()
    }
}

impl ReadyProvider {
    pub(crate) fn new(provided_type: Type, instance: Instance) -> Self {
        Self {
            provided_type,
            instance,
        }
    }
}

/// Default-construction of a registered type.
#[derive(Debug, Clone)]
pub struct DefaultConstructorProvider {
    provided_type: Type,
    constructor: ConstructorMethod,
}

impl DefaultConstructorProvider {
    pub(crate) fn new(provided_type: Type, constructor: ConstructorMethod) -> Self {
        Self {
            provided_type,
            constructor,
        }
    }
}

/// A zero-argument factory method on an already-resolved enclosing type.
#[derive(Debug, Clone)]
pub struct FactoryProvider {
    provided_type: Type,
    factory_type: Type,
    method: FactoryMethod,
}

impl FactoryProvider {
    pub(crate) fn new(factory_type: Type, method: FactoryMethod) -> Self {
        Self {
            provided_type: *method.return_type(),
            factory_type,
            method,
        }
    }

    /// The enclosing type the method is invoked on
    #[inline]
    pub fn factory_type(&self) -> &Type {
        &self.factory_type
    }

    /// The selected factory method
    #[inline]
    pub fn method(&self) -> &FactoryMethod {
        &self.method
    }
}

/// Strategy for producing one instance of one type.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Borrowed pre-existing instance
    Ready(ReadyProvider),
    /// Default-constructed instance
    DefaultConstructor(DefaultConstructorProvider),
    /// Instance produced by a factory method
    Factory(FactoryProvider),
}

impl Provider {
    /// The concrete type this provider produces
    pub fn provides(&self) -> &Type {
        match self {
            Provider::Ready(p) => &p.provided_type,
            Provider::DefaultConstructor(p) => &p.provided_type,
            Provider::Factory(p) => &p.provided_type,
        }
    }

    /// Types that must already be resolved before this provider can run
    pub fn required_types(&self) -> Vec<Type> {
        match self {
            Provider::Ready(_) | Provider::DefaultConstructor(_) => Vec::new(),
            Provider::Factory(p) => vec![p.factory_type],
        }
    }

    /// Produce the instance.
    ///
    /// `receiver` is the already-resolved instance satisfying this provider's
    /// required type, as recorded during resolution; the instantiation order
    /// guarantees it exists when this runs. A null construction or factory
    /// result fails with [`InjectError::InstantiationFailed`].
    pub(crate) fn provide(&self, receiver: Option<&Instance>) -> Result<Instance> {
        match self {
            Provider::Ready(p) => Ok(p.instance.clone()),
            Provider::DefaultConstructor(p) => {
                trace!(
                    target: "rivet_di",
                    ty = %p.provided_type,
                    "Invoking default constructor"
                );
                p.constructor
                    .invoke()
                    .ok_or_else(|| InjectError::instantiation_failed(&p.provided_type))
            }
            Provider::Factory(p) => {
                trace!(
                    target: "rivet_di",
                    ty = %p.provided_type,
                    factory = %p.factory_type,
                    method = p.method.name(),
                    "Invoking factory method"
                );
                let receiver = receiver
                    .ok_or_else(|| InjectError::instantiation_failed(&p.provided_type))?;
                p.method
                    .invoke(receiver)
                    .ok_or_else(|| InjectError::instantiation_failed(&p.provided_type))
            }
        }
    }
}

/// Select the unique factory method on `factory` producing `required`.
///
/// Candidates are the zero-argument invocable methods of `factory` whose
/// return type implements `required`. Exactly one candidate yields
/// `Some(method)`; zero candidates yield `None` (the model builder maps this
/// to [`InjectError::UniqueFactoryMethodNotFound`]); several candidates fail
/// here with the same error.
pub(crate) fn resolve_factory_method(
    reflection: &dyn ReflectionProvider,
    required: &Type,
    factory: &Type,
) -> Result<Option<FactoryMethod>> {
    let mut candidates = Vec::new();
    for method in reflection.zero_arg_methods(factory) {
        let return_type = *method.return_type();
        if !return_type.is_valid() {
            continue;
        }
        if extract_interfaces(reflection, &return_type)?.contains(required) {
            candidates.push(method);
        }
    }

    match candidates.len() {
        1 => Ok(Some(candidates.remove(0))),
        0 => Ok(None),
        _ => Err(InjectError::unique_factory_method_not_found(required)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::TypeRegistry;
    use std::sync::Arc;

    struct Product;
    struct SubProduct;
    struct Factory;
    struct DoubleFactory;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Product>();
        registry.register::<SubProduct>().extends::<Product>();
        registry
            .register::<Factory>()
            .with_method::<SubProduct, _>("create", |_| Some(Arc::new(SubProduct)));
        registry
            .register::<DoubleFactory>()
            .with_method::<Product, _>("create1", |_| Some(Arc::new(Product)))
            .with_method::<Product, _>("create2", |_| Some(Arc::new(Product)));
        registry
    }

    #[test]
    fn test_unique_candidate_is_selected() {
        let registry = registry();
        let method =
            resolve_factory_method(&registry, &Type::of::<SubProduct>(), &Type::of::<Factory>())
                .unwrap()
                .unwrap();
        assert_eq!(method.return_type(), &Type::of::<SubProduct>());
    }

    #[test]
    fn test_supertype_requirement_matches_subtype_product() {
        let registry = registry();
        let method =
            resolve_factory_method(&registry, &Type::of::<Product>(), &Type::of::<Factory>())
                .unwrap()
                .unwrap();
        // The provider produces the method's concrete return type.
        assert_eq!(method.return_type(), &Type::of::<SubProduct>());
    }

    #[test]
    fn test_zero_candidates_yield_none() {
        struct Unrelated;
        let mut registry = registry();
        registry.register::<Unrelated>();

        let found =
            resolve_factory_method(&registry, &Type::of::<Unrelated>(), &Type::of::<Factory>())
                .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_multiple_candidates_fail() {
        let registry = registry();
        let err = resolve_factory_method(
            &registry,
            &Type::of::<Product>(),
            &Type::of::<DoubleFactory>(),
        )
        .unwrap_err();
        assert!(matches!(err, InjectError::UniqueFactoryMethodNotFound { .. }));
    }

    #[test]
    fn test_factory_provider_invokes_on_resolved_receiver() {
        let registry = registry();
        let method =
            resolve_factory_method(&registry, &Type::of::<SubProduct>(), &Type::of::<Factory>())
                .unwrap()
                .unwrap();
        let provider = Provider::Factory(FactoryProvider::new(Type::of::<Factory>(), method));

        assert_eq!(provider.provides(), &Type::of::<SubProduct>());
        assert_eq!(provider.required_types(), vec![Type::of::<Factory>()]);

        let receiver: Instance = Arc::new(Factory);
        let instance = provider.provide(Some(&receiver)).unwrap();
        assert!(instance.downcast_ref::<SubProduct>().is_some());
    }

    #[test]
    fn test_null_factory_result_fails() {
        struct NullFactory;
        let mut registry = TypeRegistry::new();
        registry.register::<Product>();
        registry
            .register::<NullFactory>()
            .with_method::<Product, _>("create", |_| None);

        let method =
            resolve_factory_method(&registry, &Type::of::<Product>(), &Type::of::<NullFactory>())
                .unwrap()
                .unwrap();
        let provider = Provider::Factory(FactoryProvider::new(Type::of::<NullFactory>(), method));

        let receiver: Instance = Arc::new(NullFactory);
        let err = provider.provide(Some(&receiver)).unwrap_err();
        assert!(matches!(err, InjectError::InstantiationFailed { .. }));
    }

    #[test]
    fn test_ready_provider_returns_same_instance() {
        let instance: Instance = Arc::new(Product);
        let provider = Provider::Ready(ReadyProvider::new(Type::of::<Product>(), instance.clone()));

        let provided = provider.provide(None).unwrap();
        assert!(Arc::ptr_eq(&provided, &instance));
        assert!(provider.required_types().is_empty());
    }
}
