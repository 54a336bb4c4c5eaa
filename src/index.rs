//! Candidate index: lookup structures over all known declarations.

use ahash::{AHashMap, AHashSet};

use crate::descriptors::Candidate;
use crate::key::ServiceKey;

/// Lookup structures built once per pass from the union of root-provided and
/// self-described candidates.
///
/// Candidate order is preserved within each binding group: direct provides
/// first, then self-described declarations in declaration order. That order
/// is what breaks priority ties later, so it must stay stable.
pub struct CandidateIndex {
    by_interface: AHashMap<ServiceKey, Vec<Candidate>>,
    by_implementation: AHashMap<ServiceKey, Vec<Candidate>>,
    valid_bindings: AHashSet<ServiceKey>,
    provided_by_collection: AHashSet<ServiceKey>,
}

impl CandidateIndex {
    /// Builds the index over `candidates`, with `provided_by_collection`
    /// bindings treated as always valid and never expanded.
    pub fn build(candidates: &[Candidate], provided_by_collection: &[ServiceKey]) -> Self {
        let mut by_interface: AHashMap<ServiceKey, Vec<Candidate>> = AHashMap::new();
        let mut by_implementation: AHashMap<ServiceKey, Vec<Candidate>> = AHashMap::new();
        let mut valid_bindings = AHashSet::new();

        for candidate in candidates {
            let binding = candidate.binding();
            valid_bindings.insert(binding.clone());
            by_interface.entry(binding).or_default().push(candidate.clone());
            by_implementation
                .entry(candidate.identity())
                .or_default()
                .push(candidate.clone());
        }

        Self {
            by_interface,
            by_implementation,
            valid_bindings,
            provided_by_collection: provided_by_collection.iter().cloned().collect(),
        }
    }

    /// All candidates bound to `binding`, in stable declaration order.
    pub fn for_binding(&self, binding: &ServiceKey) -> &[Candidate] {
        self.by_interface.get(binding).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All candidates whose implementation identity is `identity`.
    pub fn for_implementation(&self, identity: &ServiceKey) -> &[Candidate] {
        self.by_implementation
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether at least one candidate is bound to `binding`.
    pub fn is_valid_binding(&self, binding: &ServiceKey) -> bool {
        self.valid_bindings.contains(binding)
    }

    /// Whether `binding` is satisfied externally by a collection
    /// registration.
    pub fn is_provided_by_collection(&self, binding: &ServiceKey) -> bool {
        self.provided_by_collection.contains(binding)
    }

    /// Whether a dependency on `binding` can be satisfied at all.
    pub fn is_satisfiable(&self, binding: &ServiceKey) -> bool {
        self.is_provided_by_collection(binding) || self.is_valid_binding(binding)
    }

    /// Iterates all distinct bindings that have at least one candidate.
    pub fn bindings(&self) -> impl Iterator<Item = (&ServiceKey, &[Candidate])> {
        self.by_interface.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
