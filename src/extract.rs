//! Dependency extraction: constructor selection and property injection.

use crate::descriptors::FactoryRef;
use crate::key::ServiceKey;
use crate::plan::{DependencyList, DependencyRef};
use crate::symbol::{Constructor, SourceLocation, SymbolId, SymbolUniverse};

/// Why a type could not be constructed from the known candidate set.
///
/// Carries everything a diagnostic needs: the type that asked, the bindings
/// nothing satisfies, and the source position the report should point at.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingDependencies {
    pub requesting_type: SymbolId,
    pub missing: Vec<ServiceKey>,
    pub location: Option<SourceLocation>,
}

/// Selects a construction path for implementation types.
///
/// Constructor selection is greedy toward the richest satisfiable signature:
/// constructors are considered in descending parameter-count order (stable,
/// so declaration order breaks ties) and the first one whose every parameter
/// binding is satisfiable wins. When none qualifies, the richest constructor
/// becomes the diagnostic target and its unsatisfiable parameters are
/// reported against its location.
pub(crate) struct DependencyExtractor<'a> {
    universe: &'a SymbolUniverse,
    markers: &'a [SymbolId],
}

impl<'a> DependencyExtractor<'a> {
    pub fn new(universe: &'a SymbolUniverse, markers: &'a [SymbolId]) -> Self {
        Self { universe, markers }
    }

    /// Extracts the ordered dependency list of `implementation`.
    ///
    /// A candidate backed by a custom factory is a black box and contributes
    /// no dependencies. A type with no declared constructors gets the
    /// implicit default constructor. Injected properties are appended after
    /// constructor parameters, gathered from the type and its whole base
    /// chain, filtered to the markers the root opted into; they are not
    /// validity-checked here, unsatisfied ones simply stay unexpanded.
    pub fn extract<F>(
        &self,
        implementation: SymbolId,
        custom_factory: Option<&FactoryRef>,
        is_valid: F,
    ) -> Result<DependencyList, MissingDependencies>
    where
        F: Fn(&ServiceKey) -> bool,
    {
        let mut deps = DependencyList::new();
        if custom_factory.is_some() {
            return Ok(deps);
        }

        let symbol = self.universe.symbol(implementation);
        let mut constructors: Vec<&Constructor> = symbol.constructors().iter().collect();
        constructors.sort_by_key(|c| std::cmp::Reverse(c.parameters.len()));

        let selected = constructors
            .iter()
            .find(|c| c.parameters.iter().all(|p| is_valid(&p.binding())));

        match selected {
            Some(ctor) => {
                for param in &ctor.parameters {
                    let binding = param.binding();
                    deps.push(if param.collection {
                        DependencyRef::Collection(binding)
                    } else {
                        DependencyRef::Single(binding)
                    });
                }
            }
            None => {
                if let Some(target) = constructors.first() {
                    let missing: Vec<ServiceKey> = target
                        .parameters
                        .iter()
                        .map(|p| p.binding())
                        .filter(|b| !is_valid(b))
                        .collect();
                    return Err(MissingDependencies {
                        requesting_type: implementation,
                        missing,
                        location: target
                            .location
                            .clone()
                            .or_else(|| symbol.location().cloned()),
                    });
                }
                // no declared constructors: implicit default, no parameters
            }
        }

        if !self.markers.is_empty() {
            let mut chain = vec![implementation];
            chain.extend(self.universe.base_chain(implementation));
            for ty in chain {
                for prop in self.universe.symbol(ty).properties() {
                    if prop.markers.iter().any(|m| self.markers.contains(m)) {
                        let binding = ServiceKey::unkeyed(prop.target);
                        deps.push(if prop.collection {
                            DependencyRef::Collection(binding)
                        } else {
                            DependencyRef::Single(binding)
                        });
                    }
                }
            }
        }

        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;
    use crate::symbol::{Parameter, Property};

    fn valid(set: &AHashSet<ServiceKey>) -> impl Fn(&ServiceKey) -> bool + '_ {
        move |binding| set.contains(binding)
    }

    #[test]
    fn richest_satisfiable_constructor_wins() {
        let mut builder = SymbolUniverse::builder();
        let a = builder.declare_interface("IA").unwrap();
        let b = builder.declare_interface("IB").unwrap();
        let svc = builder.declare("Service").unwrap();
        builder
            .edit(svc)
            .ctor(vec![Parameter::of(a), Parameter::of(b)])
            .ctor(vec![Parameter::of(a)]);
        let universe = builder.finish().unwrap();

        // only IA satisfiable: the two-parameter constructor is rejected
        let known: AHashSet<ServiceKey> = [ServiceKey::unkeyed(a)].into_iter().collect();
        let extractor = DependencyExtractor::new(&universe, &[]);
        let deps = extractor.extract(svc, None, valid(&known)).unwrap();
        assert_eq!(deps.as_slice(), &[DependencyRef::Single(ServiceKey::unkeyed(a))]);

        let known: AHashSet<ServiceKey> = [ServiceKey::unkeyed(a), ServiceKey::unkeyed(b)]
            .into_iter()
            .collect();
        let deps = extractor.extract(svc, None, valid(&known)).unwrap();
        assert_eq!(deps.len(), 2);
    }

    #[test]
    fn no_satisfiable_constructor_reports_the_richest() {
        let mut builder = SymbolUniverse::builder();
        let a = builder.declare_interface("IA").unwrap();
        let b = builder.declare_interface("IB").unwrap();
        let svc = builder.declare("Service").unwrap();
        builder.edit(svc).ctor_at(
            vec![Parameter::of(a), Parameter::of(b)],
            SourceLocation::new("service.src", 12),
        );
        let universe = builder.finish().unwrap();

        let known: AHashSet<ServiceKey> = [ServiceKey::unkeyed(a)].into_iter().collect();
        let extractor = DependencyExtractor::new(&universe, &[]);
        let err = extractor.extract(svc, None, valid(&known)).unwrap_err();
        assert_eq!(err.requesting_type, svc);
        assert_eq!(err.missing, vec![ServiceKey::unkeyed(b)]);
        assert_eq!(err.location.unwrap().line, 12);
    }

    #[test]
    fn constructorless_type_has_no_dependencies() {
        let mut builder = SymbolUniverse::builder();
        let svc = builder.declare("Plain").unwrap();
        let universe = builder.finish().unwrap();

        let known = AHashSet::new();
        let extractor = DependencyExtractor::new(&universe, &[]);
        let deps = extractor.extract(svc, None, valid(&known)).unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn custom_factory_short_circuits_extraction() {
        let mut builder = SymbolUniverse::builder();
        let a = builder.declare_interface("IA").unwrap();
        let svc = builder.declare("Service").unwrap();
        builder.edit(svc).ctor(vec![Parameter::of(a)]);
        let universe = builder.finish().unwrap();

        let known = AHashSet::new();
        let factory = FactoryRef::new("CreateService");
        let extractor = DependencyExtractor::new(&universe, &[]);
        let deps = extractor.extract(svc, Some(&factory), valid(&known)).unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn marked_properties_append_after_parameters() {
        let mut builder = SymbolUniverse::builder();
        let marker = builder.declare_interface("InjectAttribute").unwrap();
        let other_marker = builder.declare_interface("OtherAttribute").unwrap();
        let a = builder.declare_interface("IA").unwrap();
        let p = builder.declare_interface("IP").unwrap();
        let q = builder.declare_interface("IQ").unwrap();
        let base = builder.declare("ServiceBase").unwrap();
        let svc = builder.declare("Service").unwrap();
        builder.edit(base).property(Property::marked(q, marker));
        builder
            .edit(svc)
            .base(base)
            .ctor(vec![Parameter::of(a)])
            .property(Property::marked(p, marker))
            .property(Property::marked(p, other_marker));
        let universe = builder.finish().unwrap();

        let known: AHashSet<ServiceKey> = [ServiceKey::unkeyed(a)].into_iter().collect();
        let markers = [marker];
        let extractor = DependencyExtractor::new(&universe, &markers);
        let deps = extractor.extract(svc, None, valid(&known)).unwrap();
        assert_eq!(
            deps.as_slice(),
            &[
                DependencyRef::Single(ServiceKey::unkeyed(a)),
                DependencyRef::Single(ServiceKey::unkeyed(p)),
                DependencyRef::Single(ServiceKey::unkeyed(q)),
            ]
        );
    }
}
