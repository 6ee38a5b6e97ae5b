//! Reflection capability and the built-in runtime type registry
//!
//! The resolution engine never inspects Rust types directly; it asks a
//! [`ReflectionProvider`] for ancestor chains, injection points, zero-argument
//! methods and default constructors. [`TypeRegistry`] is the built-in
//! implementation, backed by explicit registration: each component type is
//! described once with [`TypeRegistry::register`] and the engine works purely
//! off those descriptions.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use ahash::RandomState;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::types::Type;

/// A type-erased, shared component instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Marker trait for types that can participate in injection.
///
/// Automatically implemented for every `Send + Sync + 'static` type; never
/// implement it manually.
pub trait Injectable: Send + Sync + 'static {
    /// The type handle of this type
    #[inline]
    fn type_of() -> Type
    where
        Self: Sized,
    {
        Type::of::<Self>()
    }
}

impl<T: Send + Sync + 'static> Injectable for T {}

type SetterFn = dyn Fn(&Instance, Instance) -> bool + Send + Sync;
type MethodFn = dyn Fn(&Instance) -> Option<Instance> + Send + Sync;
type ConstructFn = dyn Fn() -> Option<Instance> + Send + Sync;

/// An injection point: a single-argument method delivering one dependency.
///
/// Invoking the setter returns `false` when the call itself failed, e.g. the
/// receiver or argument had an unexpected runtime type or the target slot
/// rejected the value.
#[derive(Clone)]
pub struct SetterMethod {
    name: &'static str,
    param_type: Type,
    invoke: Arc<SetterFn>,
}

impl SetterMethod {
    /// Create a setter descriptor
    pub fn new<F>(name: &'static str, param_type: Type, invoke: F) -> Self
    where
        F: Fn(&Instance, Instance) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            param_type,
            invoke: Arc::new(invoke),
        }
    }

    /// Method name, unique within one declaring type
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type of the single parameter
    #[inline]
    pub fn param_type(&self) -> &Type {
        &self.param_type
    }

    /// Deliver `value` into `receiver`; `false` means the call failed
    #[inline]
    pub fn invoke(&self, receiver: &Instance, value: Instance) -> bool {
        (self.invoke)(receiver, value)
    }
}

impl PartialEq for SetterMethod {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.param_type == other.param_type
    }
}

impl Eq for SetterMethod {}

impl std::fmt::Debug for SetterMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetterMethod")
            .field("name", &self.name)
            .field("param_type", &self.param_type)
            .finish()
    }
}

/// A zero-argument invocable method producing an instance, or null.
///
/// The invoke closure accepts only receivers whose concrete runtime type is
/// the declaring type; resolution checks this before instantiation runs.
#[derive(Clone)]
pub struct FactoryMethod {
    name: &'static str,
    declaring_type: Type,
    return_type: Type,
    invoke: Arc<MethodFn>,
}

impl FactoryMethod {
    /// Create a factory-method descriptor
    pub fn new<F>(name: &'static str, declaring_type: Type, return_type: Type, invoke: F) -> Self
    where
        F: Fn(&Instance) -> Option<Instance> + Send + Sync + 'static,
    {
        Self {
            name,
            declaring_type,
            return_type,
            invoke: Arc::new(invoke),
        }
    }

    /// Method name
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type the method was declared on; the only valid receiver type
    #[inline]
    pub fn declaring_type(&self) -> &Type {
        &self.declaring_type
    }

    /// Concrete type of the produced instance
    #[inline]
    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// Invoke on an instance of the enclosing type; `None` is a null result
    #[inline]
    pub fn invoke(&self, receiver: &Instance) -> Option<Instance> {
        (self.invoke)(receiver)
    }
}

impl PartialEq for FactoryMethod {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.declaring_type == other.declaring_type
            && self.return_type == other.return_type
    }
}

impl Eq for FactoryMethod {}

impl std::fmt::Debug for FactoryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryMethod")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("return_type", &self.return_type)
            .finish()
    }
}

/// A discoverable zero-argument constructor.
#[derive(Clone)]
pub struct ConstructorMethod {
    invoke: Arc<ConstructFn>,
}

impl ConstructorMethod {
    /// Create a constructor descriptor
    pub fn new<F>(invoke: F) -> Self
    where
        F: Fn() -> Option<Instance> + Send + Sync + 'static,
    {
        Self {
            invoke: Arc::new(invoke),
        }
    }

    /// Construct a fresh instance; `None` is a null result
    #[inline]
    pub fn invoke(&self) -> Option<Instance> {
        (self.invoke)()
    }
}

impl std::fmt::Debug for ConstructorMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorMethod").finish()
    }
}

/// Host facility serving type-structure queries for the engine.
///
/// Implementations may back this with any mechanism that can answer the same
/// queries; [`TypeRegistry`] answers them from explicit registrations.
pub trait ReflectionProvider: Send + Sync {
    /// Inheritance chain of `t`, starting at `t` itself and ending at the
    /// base object. For unregistered valid types the chain is
    /// `[t, base-object]`.
    fn ancestors(&self, t: &Type) -> Vec<Type>;

    /// All injection points declared on `t` and its ancestors, most-general
    /// ancestor first.
    fn injection_points(&self, t: &Type) -> Vec<SetterMethod>;

    /// All zero-argument invocable methods on `t` and its ancestors.
    fn zero_arg_methods(&self, t: &Type) -> Vec<FactoryMethod>;

    /// The discoverable zero-argument constructor of `t`, if any.
    fn default_constructor(&self, t: &Type) -> Option<ConstructorMethod>;

    /// Concrete type of a type-erased instance; empty if unregistered.
    fn runtime_type(&self, instance: &(dyn Any + Send + Sync)) -> Type;
}

struct TypeEntry {
    ty: Type,
    parent: Type,
    constructor: Option<ConstructorMethod>,
    setters: Vec<SetterMethod>,
    methods: Vec<FactoryMethod>,
    /// Chain from self to base object, computed once on first query
    ancestors: OnceCell<Vec<Type>>,
}

/// Registry-backed [`ReflectionProvider`].
///
/// Types are described up front and the registry is then handed (immutably)
/// to [`Injector::build`](crate::Injector::build):
///
/// ```rust
/// use rivet_di::TypeRegistry;
///
/// #[derive(Default)]
/// struct Logger;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Logger>().with_constructor(Logger::default);
/// ```
pub struct TypeRegistry {
    entries: HashMap<TypeId, TypeEntry, RandomState>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Register a runtime type and return its configuration handle.
    ///
    /// Registering a type twice returns a handle to the existing entry. The
    /// parent defaults to the base object until overridden with
    /// [`TypeConfig::extends`].
    pub fn register<T: Injectable>(&mut self) -> TypeConfig<'_, T> {
        let ty = Type::of::<T>();
        self.entries.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(target: "rivet_di", ty = %ty, "Registering runtime type");
            TypeEntry {
                ty,
                parent: Type::base_object(),
                constructor: None,
                setters: Vec::new(),
                methods: Vec::new(),
                ancestors: OnceCell::new(),
            }
        });
        TypeConfig {
            registry: self,
            _marker: PhantomData,
        }
    }

    /// Check whether a type has been registered
    #[inline]
    pub fn is_registered(&self, t: &Type) -> bool {
        self.entry(t).is_some()
    }

    /// Number of registered types
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no types are registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, t: &Type) -> Option<&TypeEntry> {
        t.id().and_then(|id| self.entries.get(&id))
    }

    fn chain(&self, t: &Type) -> Vec<Type> {
        let mut chain = Vec::new();
        let mut current = *t;
        loop {
            // A malformed parent cycle terminates at the first repeat.
            if chain.contains(&current) {
                chain.push(Type::base_object());
                break;
            }
            chain.push(current);
            if current.is_base_object() {
                break;
            }
            match self.entry(&current) {
                Some(entry) => current = entry.parent,
                None => {
                    chain.push(Type::base_object());
                    break;
                }
            }
        }
        chain
    }

    /// Chain entries from the most-general registered ancestor down to `t`
    fn lineage(&self, t: &Type) -> Vec<&TypeEntry> {
        let mut entries: Vec<&TypeEntry> = self
            .ancestors(t)
            .iter()
            .filter_map(|a| self.entry(a))
            .collect();
        entries.reverse();
        entries
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.entries.len())
            .finish()
    }
}

impl ReflectionProvider for TypeRegistry {
    fn ancestors(&self, t: &Type) -> Vec<Type> {
        if t.is_empty() {
            return Vec::new();
        }
        if t.is_base_object() {
            return vec![Type::base_object()];
        }
        match self.entry(t) {
            Some(entry) => entry.ancestors.get_or_init(|| self.chain(t)).clone(),
            None => vec![*t, Type::base_object()],
        }
    }

    fn injection_points(&self, t: &Type) -> Vec<SetterMethod> {
        self.lineage(t)
            .into_iter()
            .flat_map(|e| e.setters.iter().cloned())
            .collect()
    }

    fn zero_arg_methods(&self, t: &Type) -> Vec<FactoryMethod> {
        self.lineage(t)
            .into_iter()
            .flat_map(|e| e.methods.iter().cloned())
            .collect()
    }

    fn default_constructor(&self, t: &Type) -> Option<ConstructorMethod> {
        self.entry(t).and_then(|e| e.constructor.clone())
    }

    fn runtime_type(&self, instance: &(dyn Any + Send + Sync)) -> Type {
        let id = instance.type_id();
        self.entries
            .get(&id)
            .map(|e| e.ty)
            .unwrap_or_else(Type::empty)
    }
}

/// Chainable configuration handle for one registered type.
pub struct TypeConfig<'r, T: Injectable> {
    registry: &'r mut TypeRegistry,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Injectable> TypeConfig<'r, T> {
    fn entry_mut(&mut self) -> &mut TypeEntry {
        self.registry
            .entries
            .get_mut(&TypeId::of::<T>())
            .expect("entry inserted by register()")
    }

    /// Declare the direct ancestor of this type.
    ///
    /// Chains are single-parent; the default parent is the base object.
    pub fn extends<P: Injectable>(mut self) -> Self {
        self.entry_mut().parent = Type::of::<P>();
        self
    }

    /// Declare a discoverable zero-argument constructor
    pub fn with_constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.entry_mut().constructor = Some(ConstructorMethod::new(move || {
            Some(Arc::new(construct()) as Instance)
        }));
        self
    }

    /// Declare an injection point taking exactly the concrete type `D`.
    ///
    /// The closure receives the component and the resolved dependency and
    /// returns `false` if the value could not be stored. For injection points
    /// whose parameter is a supertype of the instance actually delivered, use
    /// [`TypeConfig::with_setter_raw`] — `Any` downcasting is exact.
    pub fn with_setter<D, F>(mut self, name: &'static str, set: F) -> Self
    where
        D: Injectable,
        F: Fn(&T, Arc<D>) -> bool + Send + Sync + 'static,
    {
        let invoke = move |receiver: &Instance, value: Instance| -> bool {
            let Some(target) = receiver.downcast_ref::<T>() else {
                return false;
            };
            match value.downcast::<D>() {
                Ok(value) => set(target, value),
                Err(_) => false,
            }
        };
        let setter = SetterMethod::new(name, Type::of::<D>(), invoke);
        self.entry_mut().setters.push(setter);
        self
    }

    /// Declare an injection point with an explicit parameter type and a
    /// type-erased value
    pub fn with_setter_raw<F>(mut self, name: &'static str, param_type: Type, set: F) -> Self
    where
        F: Fn(&T, Instance) -> bool + Send + Sync + 'static,
    {
        let invoke = move |receiver: &Instance, value: Instance| -> bool {
            let Some(target) = receiver.downcast_ref::<T>() else {
                return false;
            };
            set(target, value)
        };
        let setter = SetterMethod::new(name, param_type, invoke);
        self.entry_mut().setters.push(setter);
        self
    }

    /// Declare a zero-argument method producing an instance of `R`
    pub fn with_method<R, F>(mut self, name: &'static str, produce: F) -> Self
    where
        R: Injectable,
        F: Fn(&T) -> Option<Arc<R>> + Send + Sync + 'static,
    {
        let invoke = move |receiver: &Instance| -> Option<Instance> {
            let target = receiver.downcast_ref::<T>()?;
            produce(target).map(|value| value as Instance)
        };
        let method = FactoryMethod::new(name, Type::of::<T>(), Type::of::<R>(), invoke);
        self.entry_mut().methods.push(method);
        self
    }

    /// Declare a zero-argument method with an explicit return type and a
    /// type-erased product
    pub fn with_method_raw<F>(mut self, name: &'static str, return_type: Type, produce: F) -> Self
    where
        F: Fn(&T) -> Option<Instance> + Send + Sync + 'static,
    {
        let invoke = move |receiver: &Instance| -> Option<Instance> {
            let target = receiver.downcast_ref::<T>()?;
            produce(target)
        };
        let method = FactoryMethod::new(name, Type::of::<T>(), return_type, invoke);
        self.entry_mut().methods.push(method);
        self
    }
}
