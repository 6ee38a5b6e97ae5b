//! # Rivet DI - Setter-Based Dependency Injection for Rust
//!
//! A dependency injection engine that wires whole object graphs up front:
//! declare your types and their injection points in a registry, group them
//! into modules, and build an [`Injector`] that validates the configuration,
//! orders the graph, constructs every instance, and delivers every dependency
//! before returning. A successful build means a fully wired graph; a
//! misconfiguration means exactly one error and no half-built state.
//!
//! ## Features
//!
//! - 🔗 **Whole-graph wiring** - All instances constructed and injected at build time
//! - 🧭 **Eager validation** - Cycles, duplicates, and missing types caught before any constructor runs
//! - 🧬 **Interface resolution** - Request an ancestor type, receive its single configured implementation
//! - 🏭 **Factories** - Produce a type from a zero-argument method on another configured type
//! - 📦 **Ready objects** - Share pre-existing instances with the graph, never copied
//! - 📊 **Observable** - Tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use once_cell::sync::OnceCell;
//! use rivet_di::{Injector, Module, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Logger;
//!
//! #[derive(Default)]
//! struct Database {
//!     logger: OnceCell<Arc<Logger>>,
//! }
//!
//! // Describe types and injection points once.
//! let mut registry = TypeRegistry::new();
//! registry.register::<Logger>().with_constructor(Logger::default);
//! registry
//!     .register::<Database>()
//!     .with_constructor(Database::default)
//!     .with_setter::<Logger, _>("set_logger", |db, logger| db.logger.set(logger).is_ok());
//!
//! // Declare what this injector should manage.
//! let mut module = Module::new();
//! module.add_type::<Logger>();
//! module.add_type::<Database>();
//!
//! // Build: everything is constructed and wired here.
//! let injector = Injector::build(&registry, vec![module]).unwrap();
//! let database = injector.get::<Database>().unwrap();
//! let logger = injector.get::<Logger>().unwrap();
//! assert!(Arc::ptr_eq(database.logger.get().unwrap(), &logger));
//! ```
//!
//! ## Interfaces
//!
//! Registered types may extend other registered types; a type satisfies every
//! ancestor up its chain. Injection points may require an ancestor and will
//! receive the single configured implementation.
//!
//! ```rust
//! use rivet_di::{Injector, Module, Type, TypeRegistry};
//!
//! struct Storage;
//!
//! #[derive(Default)]
//! struct SqliteStorage;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Storage>();
//! registry
//!     .register::<SqliteStorage>()
//!     .extends::<Storage>()
//!     .with_constructor(SqliteStorage::default);
//!
//! let mut module = Module::new();
//! module.add_type::<SqliteStorage>();
//!
//! let injector = Injector::build(&registry, vec![module]).unwrap();
//! // The Storage interface resolves to the configured SqliteStorage.
//! assert!(injector.get_by_type(&Type::of::<Storage>()).is_ok());
//! ```
//!
//! ## Ready Objects and Factories
//!
//! ```rust
//! use std::sync::Arc;
//! use rivet_di::{Injector, Module, TypeRegistry};
//!
//! struct Config { url: &'static str }
//!
//! struct Connection;
//!
//! #[derive(Default)]
//! struct ConnectionPool;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Config>();
//! registry.register::<Connection>();
//! registry
//!     .register::<ConnectionPool>()
//!     .with_constructor(ConnectionPool::default)
//!     .with_method::<Connection, _>("open", |_pool| Some(Arc::new(Connection)));
//!
//! let config = Arc::new(Config { url: "postgres://localhost" });
//!
//! let mut module = Module::new();
//! module.add_ready_object::<Config>(config.clone());
//! module.add_type::<ConnectionPool>();
//! module.add_factory::<Connection, ConnectionPool>();
//!
//! let injector = Injector::build(&registry, vec![module]).unwrap();
//! assert!(Arc::ptr_eq(&injector.get::<Config>().unwrap(), &config));
//! assert!(injector.get::<Connection>().is_ok());
//! ```

mod dependency;
mod error;
mod injector;
pub mod logging;
mod model;
mod module;
mod provider;
mod reflection;
mod relations;
mod resolve;
mod sorted_vec;
mod types;

pub use dependency::*;
pub use error::*;
pub use injector::*;
pub use model::*;
pub use module::*;
pub use provider::*;
pub use reflection::*;
pub use relations::*;
pub use sorted_vec::*;
pub use types::*;

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        InjectError, Injectable, Injector, Instance, Module, Result, Type, TypeRegistry,
    };
    pub use std::sync::Arc;
}
