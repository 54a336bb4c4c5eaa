//! Resolved plans: the output contract handed to emitters.
//!
//! A [`ResolvedPlan`] is produced once per root descriptor per pass and is
//! never mutated afterward. Besides the raw resolved set it exposes the two
//! orderings an emitter needs: registration order (ascending priority, the
//! order a collection builder registers services in) and grouped primary
//! selection (descending priority per binding, the order a generated
//! provider wires its factories in).

use std::sync::Arc;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::descriptors::FactoryRef;
use crate::key::ServiceKey;
use crate::lifetime::ServiceLifetime;
use crate::symbol::{DisposeKind, SymbolId};

/// One resolved dependency of a service.
///
/// The key of a `Collection` reference applies to the element binding: the
/// collection expands to every candidate bound to (element, key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyRef {
    /// A singular reference, satisfied by the binding's primary
    Single(ServiceKey),
    /// A collection-valued reference, satisfied by every member of the
    /// binding
    Collection(ServiceKey),
}

impl DependencyRef {
    /// The binding this reference is resolved against.
    pub fn binding(&self) -> &ServiceKey {
        match self {
            DependencyRef::Single(binding) => binding,
            DependencyRef::Collection(binding) => binding,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, DependencyRef::Collection(_))
    }
}

/// Ordered dependency list of one service. Most services have a handful of
/// dependencies, so the list is inlined.
pub type DependencyList = SmallVec<[DependencyRef; 4]>;

/// One fully-resolved service in a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedService {
    pub interface_type: SymbolId,
    pub implementation_type: SymbolId,
    pub lifetime: ServiceLifetime,
    /// Constructor arguments in order, then injected properties
    pub dependencies: DependencyList,
    pub dispose: DisposeKind,
    pub custom_factory: Option<FactoryRef>,
    pub key: Option<Arc<str>>,
    pub priority: i32,
    /// Emitted code must suppress the obsolescence warning around this
    /// registration
    pub obsolete: bool,
}

impl ResolvedService {
    /// The (interface, key) binding this service satisfies.
    pub fn binding(&self) -> ServiceKey {
        ServiceKey::with_key(self.interface_type, self.key.clone())
    }

    /// The (implementation, key) identity, unique within a plan.
    pub fn identity(&self) -> ServiceKey {
        ServiceKey::with_key(self.implementation_type, self.key.clone())
    }
}

/// A service paired with its primary-selection verdict.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub service: &'a ResolvedService,
    /// The one candidate of its binding group a singular injection point
    /// resolves to
    pub is_primary: bool,
}

/// The validated construction plan for one root descriptor.
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    root: SymbolId,
    services: Vec<ResolvedService>,
}

impl ResolvedPlan {
    pub(crate) fn new(root: SymbolId, services: Vec<ResolvedService>) -> Self {
        Self { root, services }
    }

    /// Identity of the root descriptor this plan was resolved for.
    pub fn root(&self) -> SymbolId {
        self.root
    }

    /// All resolved services in resolution order.
    pub fn services(&self) -> &[ResolvedService] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Looks a service up by its (implementation, key) identity.
    pub fn service_for_identity(&self, identity: &ServiceKey) -> Option<&ResolvedService> {
        self.services.iter().find(|s| &s.identity() == identity)
    }

    /// Services in the order a collection builder registers them: ascending
    /// priority, resolution order within equal priorities. Registering the
    /// highest priority last makes it the winner under last-wins container
    /// semantics.
    pub fn registration_order(&self) -> Vec<&ResolvedService> {
        let mut ordered: Vec<&ResolvedService> = self.services.iter().collect();
        ordered.sort_by_key(|s| s.priority);
        ordered
    }

    /// Services grouped by binding in descending priority order, with the
    /// first of each group flagged primary.
    ///
    /// The primary is the service a singular (non-collection) injection
    /// point resolves to: numerically highest priority wins, ties fall to
    /// resolution order. Non-primary members stay reachable through the
    /// collection view and through direct dependencies on their concrete
    /// type.
    pub fn selections(&self) -> Vec<Selection<'_>> {
        let mut order: Vec<usize> = (0..self.services.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.services[i].priority));

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of: AHashMap<ServiceKey, usize> = AHashMap::new();
        for i in order {
            let binding = self.services[i].binding();
            match group_of.get(&binding) {
                Some(&g) => groups[g].push(i),
                None => {
                    group_of.insert(binding, groups.len());
                    groups.push(vec![i]);
                }
            }
        }

        let mut selections = Vec::with_capacity(self.services.len());
        for group in groups {
            for (rank, i) in group.into_iter().enumerate() {
                selections.push(Selection {
                    service: &self.services[i],
                    is_primary: rank == 0,
                });
            }
        }
        selections
    }

    /// The primary service for `binding`, if any service satisfies it.
    pub fn primary_for(&self, binding: &ServiceKey) -> Option<&ResolvedService> {
        self.collection_for(binding).into_iter().next()
    }

    /// Every service satisfying `binding`, descending priority order. This
    /// is what a collection-valued dependency expands to.
    pub fn collection_for(&self, binding: &ServiceKey) -> Vec<&ResolvedService> {
        let mut members: Vec<&ResolvedService> = self
            .services
            .iter()
            .filter(|s| &s.binding() == binding)
            .collect();
        members.sort_by_key(|s| std::cmp::Reverse(s.priority));
        members
    }
}
