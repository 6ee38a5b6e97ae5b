//! Error types for graph construction and lookup

use thiserror::Error;

use crate::types::Type;

/// Errors raised while building or querying an injector.
///
/// Every variant is fatal to the phase that raises it: a failed
/// [`Injector::build`](crate::Injector::build) reports exactly one error and
/// discards the partially built model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    /// An empty type handle was used where a concrete type is required
    #[error("Empty type used where a concrete component type is required")]
    EmptyType,

    /// The base-object type was used where a concrete type is required
    #[error("Base-object type cannot be configured as a component type")]
    BaseObjectType,

    /// A ready object whose runtime type is unknown to the reflection provider
    #[error("Ready object for {type_name} has an unregistered runtime type")]
    InvalidReadyObject { type_name: &'static str },

    /// A ready object does not implement its declared interface
    #[error("{implementation} does not implement {interface}")]
    InterfaceNotImplemented {
        interface: &'static str,
        implementation: &'static str,
    },

    /// Duplicate concrete registration, or one interface claimed by two types
    #[error("Ambiguous registration for {type_name}")]
    AmbiguousTypes { type_name: &'static str },

    /// A type registered for default construction has no constructor
    #[error("No default constructor found for {type_name}")]
    DefaultConstructorNotFound { type_name: &'static str },

    /// Zero or multiple factory-method candidates for a required type
    #[error("No unique factory method producing {type_name}")]
    UniqueFactoryMethodNotFound { type_name: &'static str },

    /// A factory method cannot run on the type configured to satisfy its
    /// enclosing type
    #[error("Factory method {method} is declared on {declaring}, which {implementation} does not carry")]
    InvalidFactoryReceiver {
        method: &'static str,
        declaring: &'static str,
        implementation: &'static str,
    },

    /// A type declares an injection point requiring itself
    #[error("{type_name} declares a dependency on itself")]
    DependencyOnSelf { type_name: &'static str },

    /// A type declares an injection point requiring its own descendant
    #[error("{type_name} declares a dependency on its own subtype {required}")]
    DependencyOnSubtype {
        type_name: &'static str,
        required: &'static str,
    },

    /// A type declares an injection point requiring its own ancestor
    #[error("{type_name} declares a dependency on its own supertype {required}")]
    DependencyOnSupertype {
        type_name: &'static str,
        required: &'static str,
    },

    /// Two injection points on one type require the same type
    #[error("{type_name} declares duplicated dependency on {required}")]
    DependencyDuplicated {
        type_name: &'static str,
        required: &'static str,
    },

    /// An injection point has an empty or base-object parameter type
    #[error("Invalid injection point {setter} on {type_name}")]
    InvalidSetter {
        type_name: &'static str,
        setter: &'static str,
    },

    /// A provider requires types that no configured provider supplies
    #[error("Required types not available: {}", type_names.join(", "))]
    UnavailableRequiredTypes { type_names: Vec<&'static str> },

    /// Unsatisfied or cyclic dependencies in the configured model
    #[error("Unresolvable dependencies: {}", type_names.join(", "))]
    UnresolvableDependencies { type_names: Vec<&'static str> },

    /// A provider or injection call failed at instantiation time
    #[error("Failed to instantiate {type_name}")]
    InstantiationFailed { type_name: &'static str },

    /// Post-build lookup of a type that was never registered
    #[error("Unknown type: {type_name}")]
    UnknownType { type_name: &'static str },
}

impl InjectError {
    /// Create an InvalidReadyObject error for a declared type
    #[inline]
    pub fn invalid_ready_object(declared: &Type) -> Self {
        Self::InvalidReadyObject {
            type_name: declared.display_name(),
        }
    }

    /// Create an InterfaceNotImplemented error
    #[inline]
    pub fn interface_not_implemented(interface: &Type, implementation: &Type) -> Self {
        Self::InterfaceNotImplemented {
            interface: interface.display_name(),
            implementation: implementation.display_name(),
        }
    }

    /// Create an AmbiguousTypes error
    #[inline]
    pub fn ambiguous_types(t: &Type) -> Self {
        Self::AmbiguousTypes {
            type_name: t.display_name(),
        }
    }

    /// Create a DefaultConstructorNotFound error
    #[inline]
    pub fn default_constructor_not_found(t: &Type) -> Self {
        Self::DefaultConstructorNotFound {
            type_name: t.display_name(),
        }
    }

    /// Create a UniqueFactoryMethodNotFound error
    #[inline]
    pub fn unique_factory_method_not_found(t: &Type) -> Self {
        Self::UniqueFactoryMethodNotFound {
            type_name: t.display_name(),
        }
    }

    /// Create an InvalidFactoryReceiver error
    #[inline]
    pub fn invalid_factory_receiver(
        method: &'static str,
        declaring: &Type,
        implementation: &Type,
    ) -> Self {
        Self::InvalidFactoryReceiver {
            method,
            declaring: declaring.display_name(),
            implementation: implementation.display_name(),
        }
    }

    /// Create an InstantiationFailed error
    #[inline]
    pub fn instantiation_failed(t: &Type) -> Self {
        Self::InstantiationFailed {
            type_name: t.display_name(),
        }
    }

    /// Create an UnknownType error
    #[inline]
    pub fn unknown_type(t: &Type) -> Self {
        Self::UnknownType {
            type_name: t.display_name(),
        }
    }
}

/// Result type alias for injector operations
pub type Result<T> = std::result::Result<T, InjectError>;
