//! Injector: build the object graph and look instances up
//!
//! [`Injector::build`] drives the whole pipeline: validate the configuration
//! into a types model, resolve the dependency graph and compute the
//! instantiation order, run every provider in that order, then invoke every
//! injection point with its resolved instance. A failure in any phase aborts
//! the build and the error is the only observable output; a successful build
//! yields a read-only, fully wired graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{InjectError, Result};
use crate::model::{TypesModel, make_types_model};
use crate::module::Module;
use crate::reflection::{Injectable, Instance, ReflectionProvider};
use crate::resolve::{InstantiationPlan, resolve_model};
use crate::types::Type;

/// A fully built, immutable object graph.
///
/// Constructed instances are owned by the injector; ready objects are shared
/// with their creator. Once built the injector is read-only and may be
/// queried from multiple threads.
///
/// ```rust
/// use std::sync::Arc;
/// use once_cell::sync::OnceCell;
/// use rivet_di::{Injector, Module, TypeRegistry};
///
/// #[derive(Default)]
/// struct Logger;
///
/// #[derive(Default)]
/// struct Database {
///     logger: OnceCell<Arc<Logger>>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Logger>().with_constructor(Logger::default);
/// registry
///     .register::<Database>()
///     .with_constructor(Database::default)
///     .with_setter::<Logger, _>("set_logger", |db, logger| db.logger.set(logger).is_ok());
///
/// let mut module = Module::new();
/// module.add_type::<Logger>();
/// module.add_type::<Database>();
///
/// let injector = Injector::build(&registry, vec![module]).unwrap();
/// let database = injector.get::<Database>().unwrap();
/// let logger = injector.get::<Logger>().unwrap();
/// assert!(Arc::ptr_eq(database.logger.get().unwrap(), &logger));
/// ```
pub struct Injector {
    model: TypesModel,
    instances: BTreeMap<Type, Instance>,
}

impl Injector {
    /// Build the object graph from configuration units.
    ///
    /// Runs validating, ordering, instantiating and injecting in sequence;
    /// the first error in any phase aborts the whole build.
    pub fn build(reflection: &dyn ReflectionProvider, modules: Vec<Module>) -> Result<Self> {
        debug!(target: "rivet_di", modules = modules.len(), "Validating configuration");
        let model = make_types_model(reflection, modules)?;

        debug!(target: "rivet_di", types = model.len(), "Resolving dependency graph");
        let plan = resolve_model(&model)?;

        let instances = instantiate(&model, &plan)?;
        inject(&model, &plan, &instances)?;

        debug!(target: "rivet_di", instances = instances.len(), "Injector ready");
        Ok(Self { model, instances })
    }

    /// Look up the instance satisfying type `T`.
    ///
    /// `T` must be the concrete type of the instance; for an interface whose
    /// implementation is a different concrete type, use
    /// [`Injector::get_by_type`].
    pub fn get<T: Injectable>(&self) -> Result<Arc<T>> {
        let t = Type::of::<T>();
        self.get_by_type(&t)?
            .downcast::<T>()
            .map_err(|_| InjectError::unknown_type(&t))
    }

    /// Look up the type-erased instance satisfying an interface.
    ///
    /// Fails with [`InjectError::UnknownType`] when no configured type
    /// implements the interface.
    pub fn get_by_type(&self, interface: &Type) -> Result<Instance> {
        let implementation = self
            .model
            .resolve_interface(interface)
            .ok_or_else(|| InjectError::unknown_type(interface))?;
        self.instances
            .get(&implementation)
            .cloned()
            .ok_or_else(|| InjectError::unknown_type(interface))
    }

    /// All configured concrete types, ascending by name
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.model.types()
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("instances", &self.instances.len())
            .finish()
    }
}

/// Run every provider strictly in plan order.
fn instantiate(model: &TypesModel, plan: &InstantiationPlan) -> Result<BTreeMap<Type, Instance>> {
    let mut instances: BTreeMap<Type, Instance> = BTreeMap::new();
    for t in plan.order() {
        let provider = model
            .provider(t)
            .ok_or_else(|| InjectError::instantiation_failed(t))?;
        debug!(target: "rivet_di", ty = %t, "Instantiating");
        let receiver = plan.receiver_of(t).and_then(|r| instances.get(r));
        let instance = provider.provide(receiver)?;
        instances.insert(*t, instance);
    }
    Ok(instances)
}

/// Deliver every resolved dependency through its injection point.
fn inject(
    model: &TypesModel,
    plan: &InstantiationPlan,
    instances: &BTreeMap<Type, Instance>,
) -> Result<()> {
    for t in model.types() {
        let receiver = instances
            .get(t)
            .ok_or_else(|| InjectError::instantiation_failed(t))?;
        for resolved in plan.resolved_dependencies(t) {
            let value = instances
                .get(resolved.implementation())
                .cloned()
                .ok_or_else(|| InjectError::instantiation_failed(t))?;
            debug!(
                target: "rivet_di",
                ty = %t,
                setter = resolved.dependency().setter().name(),
                dependency = %resolved.implementation(),
                "Injecting dependency"
            );
            if !resolved.dependency().setter().invoke(receiver, value) {
                return Err(InjectError::instantiation_failed(t));
            }
        }
    }
    Ok(())
}
