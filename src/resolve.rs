//! Dependency-graph resolution and instantiation ordering
//!
//! For the whole types model this resolves every dependency edge through the
//! implemented-by relation, validates that everything a provider needs is
//! configured, and computes the required-to-instantiate order: a total order
//! in which every type appears after everything its provider or dependencies
//! require.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dependency::Dependency;
use crate::error::{InjectError, Result};
use crate::model::TypesModel;
use crate::provider::Provider;
use crate::types::Type;

/// One dependency edge together with the concrete type satisfying it.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedDependency {
    dependency: Dependency,
    implementation: Type,
}

impl ResolvedDependency {
    /// The original dependency (required type and injection point)
    #[inline]
    pub(crate) fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// The configured type whose instance satisfies the edge
    #[inline]
    pub(crate) fn implementation(&self) -> &Type {
        &self.implementation
    }
}

/// Output of resolution: the instantiation order plus, per type, the
/// resolved form of each of its dependency edges and the concrete type
/// satisfying its provider's own requirement.
#[derive(Debug)]
pub(crate) struct InstantiationPlan {
    order: Vec<Type>,
    resolved: BTreeMap<Type, Vec<ResolvedDependency>>,
    receivers: BTreeMap<Type, Type>,
}

impl InstantiationPlan {
    /// Types in required-to-instantiate order
    #[inline]
    pub(crate) fn order(&self) -> &[Type] {
        &self.order
    }

    /// Resolved dependency edges of one type
    #[inline]
    pub(crate) fn resolved_dependencies(&self, t: &Type) -> &[ResolvedDependency] {
        self.resolved.get(t).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Concrete type resolved to satisfy the provider requirement of `t`
    #[inline]
    pub(crate) fn receiver_of(&self, t: &Type) -> Option<&Type> {
        self.receivers.get(t)
    }
}

/// Resolve the dependency graph of `model` and compute the plan.
///
/// Fails with [`InjectError::UnresolvableDependencies`] when a required
/// interface has no configured implementation or the graph contains a cycle,
/// with [`InjectError::UnavailableRequiredTypes`] when a provider's own
/// requirement (a factory's enclosing type) is not configured, and with
/// [`InjectError::InvalidFactoryReceiver`] when the type satisfying that
/// requirement is not the one the factory method was declared on.
pub(crate) fn resolve_model(model: &TypesModel) -> Result<InstantiationPlan> {
    let mut edges: BTreeMap<Type, Vec<Type>> = BTreeMap::new();
    let mut resolved: BTreeMap<Type, Vec<ResolvedDependency>> = BTreeMap::new();
    let mut receivers: BTreeMap<Type, Type> = BTreeMap::new();
    let mut unresolvable: Vec<&'static str> = Vec::new();
    let mut unavailable: Vec<&'static str> = Vec::new();

    for t in model.types() {
        let mut type_edges = Vec::new();
        let mut type_resolved = Vec::new();

        if let Some(dependencies) = model.dependencies_of(t) {
            for dependency in dependencies.dependencies() {
                match model.resolve_interface(dependency.required_type()) {
                    Some(implementation) => {
                        type_edges.push(implementation);
                        type_resolved.push(ResolvedDependency {
                            dependency: dependency.clone(),
                            implementation,
                        });
                    }
                    None => unresolvable.push(dependency.required_type().display_name()),
                }
            }
        }

        if let Some(provider) = model.provider(t) {
            for required in provider.required_types() {
                match model.resolve_interface(&required) {
                    Some(implementation) => {
                        // Factory methods downcast their receiver to the
                        // declaring type, so only an instance of exactly that
                        // type can run them.
                        if let Provider::Factory(p) = provider {
                            let declaring = p.method().declaring_type();
                            if &implementation != declaring {
                                return Err(InjectError::invalid_factory_receiver(
                                    p.method().name(),
                                    declaring,
                                    &implementation,
                                ));
                            }
                        }
                        type_edges.push(implementation);
                        receivers.insert(*t, implementation);
                    }
                    None => unavailable.push(required.display_name()),
                }
            }
        }

        edges.insert(*t, type_edges);
        resolved.insert(*t, type_resolved);
    }

    if !unresolvable.is_empty() {
        unresolvable.sort_unstable();
        unresolvable.dedup();
        return Err(InjectError::UnresolvableDependencies {
            type_names: unresolvable,
        });
    }
    if !unavailable.is_empty() {
        unavailable.sort_unstable();
        unavailable.dedup();
        return Err(InjectError::UnavailableRequiredTypes {
            type_names: unavailable,
        });
    }

    let order = instantiation_order(&edges)?;
    debug!(
        target: "rivet_di",
        types = order.len(),
        "Computed instantiation order"
    );

    Ok(InstantiationPlan {
        order,
        resolved,
        receivers,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Visited,
}

/// Depth-first topological sort; a node re-encountered while still visiting
/// signals a cycle.
fn instantiation_order(edges: &BTreeMap<Type, Vec<Type>>) -> Result<Vec<Type>> {
    let mut marks: BTreeMap<Type, Mark> = BTreeMap::new();
    let mut order: Vec<Type> = Vec::with_capacity(edges.len());

    for t in edges.keys() {
        visit(t, edges, &mut marks, &mut order)?;
    }
    Ok(order)
}

fn visit(
    t: &Type,
    edges: &BTreeMap<Type, Vec<Type>>,
    marks: &mut BTreeMap<Type, Mark>,
    order: &mut Vec<Type>,
) -> Result<()> {
    match marks.get(t) {
        Some(Mark::Visited) => return Ok(()),
        Some(Mark::Visiting) => {
            let mut cycle: Vec<&'static str> = marks
                .iter()
                .filter(|(_, mark)| **mark == Mark::Visiting)
                .map(|(ty, _)| ty.display_name())
                .collect();
            cycle.sort_unstable();
            return Err(InjectError::UnresolvableDependencies { type_names: cycle });
        }
        None => {}
    }

    marks.insert(*t, Mark::Visiting);
    if let Some(requirements) = edges.get(t) {
        for requirement in requirements {
            visit(requirement, edges, marks, order)?;
        }
    }
    marks.insert(*t, Mark::Visited);
    order.push(*t);
    Ok(())
}
