//! Graph resolution: the worklist pass turning candidates into plans.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use ahash::{AHashMap, AHashSet};

use crate::descriptors::{Candidate, RootDescriptor};
use crate::diagnostics::{DiagnosticReporter, DiagnosticsSink};
use crate::extract::DependencyExtractor;
use crate::index::CandidateIndex;
use crate::key::ServiceKey;
use crate::observer::{Observers, ResolveObserver};
use crate::plan::{ResolvedPlan, ResolvedService};
use crate::symbol::{SymbolId, SymbolUniverse};

/// Resolves root descriptors into validated construction plans.
///
/// The resolver is built once per invocation over the symbol universe and
/// the self-described candidates discovered alongside it, then run once per
/// root. Passes are independent: each gathers its own candidate set from
/// scratch, so a root failing never contaminates its siblings.
///
/// # Examples
///
/// ```rust
/// use wireplan::{
///     Candidate, DiagnosticsSink, GraphResolver, RootDescriptor, ServiceLifetime,
///     SymbolUniverse,
/// };
///
/// let mut builder = SymbolUniverse::builder();
/// let provider = builder.declare("AppProvider").unwrap();
/// let greeter = builder.declare("Greeter").unwrap();
/// let universe = builder.finish().unwrap();
///
/// let root = RootDescriptor::new(provider)
///     .provide(Candidate::self_typed(greeter, ServiceLifetime::Singleton));
///
/// let resolver = GraphResolver::new(&universe, &[]);
/// let sink = DiagnosticsSink::new();
/// let plan = resolver.resolve(&root, &sink).unwrap();
/// assert_eq!(plan.len(), 1);
/// ```
pub struct GraphResolver<'a> {
    universe: &'a SymbolUniverse,
    self_described: &'a [Candidate],
    observers: Observers,
}

impl<'a> GraphResolver<'a> {
    pub fn new(universe: &'a SymbolUniverse, self_described: &'a [Candidate]) -> Self {
        Self {
            universe,
            self_described,
            observers: Observers::default(),
        }
    }

    /// Registers an observer notified by every subsequent pass.
    pub fn add_observer(&mut self, observer: Arc<dyn ResolveObserver>) {
        self.observers.add(observer);
    }

    pub fn universe(&self) -> &SymbolUniverse {
        self.universe
    }

    /// Resolves every root in order. Failed roots yield `None` in the
    /// corresponding slot; their diagnostics are in the sink.
    pub fn resolve_all(
        &self,
        roots: &[RootDescriptor],
        sink: &DiagnosticsSink,
    ) -> Vec<Option<ResolvedPlan>> {
        roots.iter().map(|root| self.resolve(root, sink)).collect()
    }

    /// Runs one resolution pass for `root`.
    ///
    /// Returns the complete plan, or `None` when any reachable service could
    /// not be satisfied; all failures of the pass are reported into `sink`
    /// before returning.
    pub fn resolve(&self, root: &RootDescriptor, sink: &DiagnosticsSink) -> Option<ResolvedPlan> {
        let root_name = self.universe.name(root.symbol);
        let started = Instant::now();
        self.observers.pass_started(root_name);
        let reporter = DiagnosticReporter::new(sink, root.symbol);

        // The index spans everything declared anywhere: validity of a
        // dependency does not depend on how its provider was seeded.
        let mut all: Vec<Candidate> = root.provides.clone();
        all.extend(self.self_described.iter().cloned());
        let index = CandidateIndex::build(&all, &root.provided_by_collection);
        let is_valid = |binding: &ServiceKey| index.is_satisfiable(binding);
        let extractor = DependencyExtractor::new(self.universe, &root.property_markers);

        let mut queue: VecDeque<Candidate> = root.provides.iter().cloned().collect();
        queue.extend(
            self.self_described
                .iter()
                .filter(|c| c.provide_to == Some(root.symbol))
                .cloned(),
        );
        if root.include_all_services {
            queue.extend(self.self_described.iter().cloned());
        }

        // Include rules seed additional roots: each gets its own candidates
        // plus the candidates satisfying its constructor dependencies.
        for root_sym in self.collect_service_roots(root) {
            // a self-described declaration on the type pins its key
            let key = self
                .self_described
                .iter()
                .find(|c| c.implementation_type == root_sym)
                .and_then(|c| c.key.clone());
            let identity = ServiceKey::with_key(root_sym, key);
            let own = index.for_implementation(&identity);
            queue.extend(own.iter().cloned());

            match extractor.extract(root_sym, None, is_valid) {
                Ok(deps) => {
                    for dep in &deps {
                        queue.extend(index.for_binding(dep.binding()).iter().cloned());
                    }
                }
                Err(missing) => {
                    // with no candidates of its own the type never reaches
                    // the worklist, so this is the only chance to report it
                    if own.is_empty() {
                        reporter.report_missing_services(missing);
                    }
                }
            }
        }

        let mut services: Vec<ResolvedService> = Vec::new();
        let mut by_identity: AHashMap<ServiceKey, usize> = AHashMap::new();
        let mut failed: AHashSet<ServiceKey> = AHashSet::new();

        while let Some(candidate) = queue.pop_front() {
            let binding = candidate.binding();
            let identity = candidate.identity();
            if index.is_provided_by_collection(&binding)
                || index.is_provided_by_collection(&identity)
            {
                continue;
            }
            // an already-reported failure counts as seen, so one
            // unsatisfiable service surfaces once however many consumers
            // reach it
            if failed.contains(&identity) || failed.contains(&binding) {
                continue;
            }
            if let Some(&existing) = by_identity.get(&identity) {
                if !same_registration(&services[existing], &candidate) {
                    reporter.report_duplicate_service(vec![candidate.implementation_type]);
                }
                continue;
            }
            if by_identity.contains_key(&binding) {
                continue;
            }

            let dependencies = match extractor.extract(
                candidate.implementation_type,
                candidate.custom_factory.as_ref(),
                is_valid,
            ) {
                Ok(deps) => deps,
                Err(missing) => {
                    failed.insert(identity);
                    reporter.report_missing_services(missing);
                    continue;
                }
            };

            let implementation = self.universe.symbol(candidate.implementation_type);
            let interface = self.universe.symbol(candidate.interface_type);
            let dep_bindings: Vec<ServiceKey> = dependencies
                .iter()
                .map(|d| d.binding().clone())
                .collect();

            self.observers
                .service_resolved(root_name, implementation.name());
            by_identity.insert(identity, services.len());
            services.push(ResolvedService {
                interface_type: candidate.interface_type,
                implementation_type: candidate.implementation_type,
                lifetime: candidate.lifetime,
                dependencies,
                dispose: implementation.dispose(),
                custom_factory: candidate.custom_factory,
                key: candidate.key,
                priority: candidate.priority,
                obsolete: interface.is_obsolete() || implementation.is_obsolete(),
            });

            for target in dep_bindings {
                if index.is_provided_by_collection(&target)
                    || by_identity.contains_key(&target)
                    || failed.contains(&target)
                {
                    continue;
                }
                queue.extend(index.for_binding(&target).iter().cloned());
            }
        }

        self.check_factory_exclusivity(&services, &reporter);

        if reporter.has_error() {
            self.observers
                .pass_failed(root_name, sink.for_root(root.symbol).len());
            return None;
        }
        let plan = ResolvedPlan::new(root.symbol, services);
        self.observers
            .pass_completed(root_name, plan.len(), started.elapsed());
        Some(plan)
    }

    /// Expands the root's include rules into concrete service-root symbols.
    fn collect_service_roots(&self, root: &RootDescriptor) -> Vec<SymbolId> {
        let mut roots = Vec::new();
        for &iface in &root.include_interface_implementors {
            roots.extend(self.universe.ids().filter(|&ty| {
                !self.universe.symbol(ty).is_abstract() && self.universe.implements(ty, iface)
            }));
        }
        for &class in &root.include_class_inheritors {
            roots.extend(self.universe.ids().filter(|&ty| {
                !self.universe.symbol(ty).is_abstract() && self.universe.inherits(ty, class)
            }));
        }
        roots.extend(root.include_dependencies.iter().copied());
        roots
    }

    /// A factory-backed service claims sole ownership of its binding; any
    /// binding group that mixes a factory with other members is a conflict.
    /// Plain multi-candidate groups are legal, the collection view and
    /// primary selection give them meaning.
    fn check_factory_exclusivity(
        &self,
        services: &[ResolvedService],
        reporter: &DiagnosticReporter<'_>,
    ) {
        let mut groups: Vec<(ServiceKey, Vec<SymbolId>, bool)> = Vec::new();
        let mut group_of: AHashMap<ServiceKey, usize> = AHashMap::new();
        for service in services {
            let binding = service.binding();
            let has_factory = service.custom_factory.is_some();
            match group_of.get(&binding) {
                Some(&g) => {
                    groups[g].1.push(service.implementation_type);
                    groups[g].2 |= has_factory;
                }
                None => {
                    group_of.insert(binding.clone(), groups.len());
                    groups.push((binding, vec![service.implementation_type], has_factory));
                }
            }
        }
        for (_, members, has_factory) in groups {
            if members.len() > 1 && has_factory {
                reporter.report_duplicate_service(members);
            }
        }
    }
}

/// Whether a second declaration of the same (implementation, key) identity
/// agrees with the already-resolved one in every observable respect.
fn same_registration(existing: &ResolvedService, candidate: &Candidate) -> bool {
    existing.interface_type == candidate.interface_type
        && existing.lifetime == candidate.lifetime
        && existing.custom_factory == candidate.custom_factory
        && existing.priority == candidate.priority
}
