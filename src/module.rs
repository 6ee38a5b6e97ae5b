//! Configuration units
//!
//! A [`Module`] declares what an injector should manage: ready objects,
//! types to default-construct, and (required type, factory type) pairs.
//! Modules only record declarations; all validation happens inside
//! [`Injector::build`](crate::Injector::build), so a misconfigured module
//! surfaces as exactly one build error.

use tracing::debug;

use crate::reflection::{Injectable, Instance};
use crate::types::Type;

#[derive(Clone)]
pub(crate) enum Registration {
    /// Pre-existing instance declared to satisfy a type
    Ready { declared: Type, instance: Instance },
    /// Type to be default-constructed
    Construct { ty: Type },
    /// Required type produced by a factory type's unique method
    Factory { required: Type, factory: Type },
}

/// One configuration unit, aggregated into a types model at build time.
///
/// An empty module is valid and contributes nothing.
#[derive(Default)]
pub struct Module {
    registrations: Vec<Registration>,
}

impl Module {
    /// Create an empty module
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a pre-existing instance satisfying type `T`.
    ///
    /// The instance may be of `T` itself or of any registered descendant of
    /// `T`; it is borrowed, never constructed or dropped by the injector.
    pub fn add_ready_object<T: Injectable>(&mut self, instance: Instance) -> &mut Self {
        let declared = Type::of::<T>();
        debug!(target: "rivet_di", ty = %declared, "Declaring ready object");
        self.registrations.push(Registration::Ready {
            declared,
            instance,
        });
        self
    }

    /// Declare a type to be default-constructed by the injector
    pub fn add_type<T: Injectable>(&mut self) -> &mut Self {
        let ty = Type::of::<T>();
        debug!(target: "rivet_di", ty = %ty, "Declaring default-constructed type");
        self.registrations.push(Registration::Construct { ty });
        self
    }

    /// Declare that instances of `Required` come from a unique zero-argument
    /// method on `Factory`.
    ///
    /// The factory type must itself be resolvable (configured as a ready
    /// object, constructed type, or another factory's product).
    pub fn add_factory<Required: Injectable, Factory: Injectable>(&mut self) -> &mut Self {
        let required = Type::of::<Required>();
        let factory = Type::of::<Factory>();
        debug!(
            target: "rivet_di",
            required = %required,
            factory = %factory,
            "Declaring factory registration"
        );
        self.registrations.push(Registration::Factory { required, factory });
        self
    }

    /// Number of declarations in this module
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Check if the module declares nothing
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub(crate) fn into_registrations(self) -> Vec<Registration> {
        self.registrations
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("registrations", &self.registrations.len())
            .finish()
    }
}
