//! The validated types model
//!
//! Aggregates providers from all configuration units into one registry of
//! known types, their dependencies, and the implemented-by relation. The
//! model is built once per [`Injector::build`](crate::Injector::build) call
//! and is immutable afterwards; any invalid declaration aborts the build.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dependency::{TypeDependencies, extract_dependencies};
use crate::error::{InjectError, Result};
use crate::module::{Module, Registration};
use crate::provider::{
    DefaultConstructorProvider, FactoryProvider, Provider, ReadyProvider, resolve_factory_method,
};
use crate::reflection::ReflectionProvider;
use crate::relations::{
    ImplementedBy, ImplementedByMapping, extract_interfaces, implements,
    make_implemented_by_mapping,
};
use crate::types::{Type, validate};

/// Validated union of all configured types, their providers, dependencies,
/// and the implemented-by relation.
#[derive(Debug)]
pub struct TypesModel {
    providers: BTreeMap<Type, Provider>,
    dependencies: BTreeMap<Type, TypeDependencies>,
    implemented_by: ImplementedByMapping,
}

impl TypesModel {
    /// All configured concrete types, ascending by name
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.providers.keys()
    }

    /// Provider for a configured concrete type
    pub fn provider(&self, t: &Type) -> Option<&Provider> {
        self.providers.get(t)
    }

    /// Dependencies of a configured concrete type
    pub fn dependencies_of(&self, t: &Type) -> Option<&TypeDependencies> {
        self.dependencies.get(t)
    }

    /// The interface → implementation mapping
    pub fn implemented_by(&self) -> &ImplementedByMapping {
        &self.implemented_by
    }

    /// Resolve an interface to the concrete type satisfying it
    pub fn resolve_interface(&self, interface: &Type) -> Option<Type> {
        self.implemented_by
            .get(interface)
            .map(|relation| *relation.implementation_type())
    }

    /// Number of configured concrete types
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if no types are configured
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Build and validate the types model from configuration units.
pub(crate) fn make_types_model(
    reflection: &dyn ReflectionProvider,
    modules: Vec<Module>,
) -> Result<TypesModel> {
    let mut providers: BTreeMap<Type, Provider> = BTreeMap::new();

    for registration in modules.into_iter().flat_map(Module::into_registrations) {
        let provider = make_provider(reflection, registration)?;
        let provided = *provider.provides();
        if providers.contains_key(&provided) {
            return Err(InjectError::ambiguous_types(&provided));
        }
        providers.insert(provided, provider);
    }

    let mut dependencies = BTreeMap::new();
    for t in providers.keys() {
        dependencies.insert(*t, extract_dependencies(reflection, t)?);
    }

    let implemented_by = make_implemented_by(reflection, &providers)?;

    debug!(
        target: "rivet_di",
        types = providers.len(),
        interfaces = implemented_by.len(),
        "Types model validated"
    );

    Ok(TypesModel {
        providers,
        dependencies,
        implemented_by,
    })
}

fn make_provider(
    reflection: &dyn ReflectionProvider,
    registration: Registration,
) -> Result<Provider> {
    match registration {
        Registration::Ready { declared, instance } => {
            validate(&declared)?;
            let concrete = reflection.runtime_type(instance.as_ref());
            if concrete.is_empty() {
                return Err(InjectError::invalid_ready_object(&declared));
            }
            if concrete != declared && !implements(reflection, &concrete, &declared)? {
                return Err(InjectError::interface_not_implemented(&declared, &concrete));
            }
            // Keyed by the concrete runtime type so the instance's full
            // interface set registers.
            Ok(Provider::Ready(ReadyProvider::new(concrete, instance)))
        }
        Registration::Construct { ty } => {
            validate(&ty)?;
            let constructor = reflection
                .default_constructor(&ty)
                .ok_or_else(|| InjectError::default_constructor_not_found(&ty))?;
            Ok(Provider::DefaultConstructor(DefaultConstructorProvider::new(
                ty,
                constructor,
            )))
        }
        Registration::Factory { required, factory } => {
            validate(&required)?;
            validate(&factory)?;
            let method = resolve_factory_method(reflection, &required, &factory)?
                .ok_or_else(|| InjectError::unique_factory_method_not_found(&required))?;
            Ok(Provider::Factory(FactoryProvider::new(factory, method)))
        }
    }
}

/// Map every interface of every configured type to its implementation.
///
/// An exact-type claim (a type mapping its own handle) always takes
/// precedence; an ancestor interface claimed by two different configured
/// types is ambiguous.
fn make_implemented_by(
    reflection: &dyn ReflectionProvider,
    providers: &BTreeMap<Type, Provider>,
) -> Result<ImplementedByMapping> {
    let mut mapping = make_implemented_by_mapping();
    for t in providers.keys() {
        mapping.add(ImplementedBy::new(*t, *t));
    }

    for t in providers.keys() {
        for interface in extract_interfaces(reflection, t)?.iter() {
            if interface == t {
                continue;
            }
            match mapping.get(interface).copied() {
                None => mapping.add(ImplementedBy::new(*interface, *t)),
                Some(existing) => {
                    if existing.implementation_type() == existing.interface_type() {
                        // Exact registration wins over the ancestor claim.
                        continue;
                    }
                    if existing.implementation_type() != t {
                        return Err(InjectError::ambiguous_types(interface));
                    }
                }
            }
        }
    }
    Ok(mapping)
}
