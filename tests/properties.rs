use wireplan::{
    Candidate, DependencyRef, DiagnosticsSink, GraphResolver, Parameter, Property,
    RootDescriptor, ServiceKey, ServiceLifetime, SymbolUniverse,
};

#[test]
fn marked_properties_are_injected_after_constructor_parameters() {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("AppProvider").unwrap();
    let marker = builder.declare_interface("InjectAttribute").unwrap();
    let logger = builder.declare_interface("ILogger").unwrap();
    let console = builder.declare("ConsoleLogger").unwrap();
    let tracer = builder.declare("Tracer").unwrap();
    let service = builder.declare("PageService").unwrap();
    builder.edit(console).implements(logger);
    builder
        .edit(service)
        .ctor(vec![Parameter::of(logger)])
        .property(Property::marked(tracer, marker));
    let universe = builder.finish().unwrap();

    let root = RootDescriptor::new(provider)
        .provide(Candidate::new(logger, console, ServiceLifetime::Singleton))
        .provide(Candidate::self_typed(tracer, ServiceLifetime::Singleton))
        .provide(Candidate::self_typed(service, ServiceLifetime::Transient))
        .property_marker(marker);

    let sink = DiagnosticsSink::new();
    let plan = GraphResolver::new(&universe, &[]).resolve(&root, &sink).unwrap();
    let svc = plan.service_for_identity(&ServiceKey::unkeyed(service)).unwrap();
    assert_eq!(
        svc.dependencies.as_slice(),
        &[
            DependencyRef::Single(ServiceKey::unkeyed(logger)),
            DependencyRef::Single(ServiceKey::unkeyed(tracer)),
        ]
    );
}

#[test]
fn properties_without_an_opted_in_marker_are_ignored() {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("AppProvider").unwrap();
    let marker = builder.declare_interface("InjectAttribute").unwrap();
    let tracer = builder.declare("Tracer").unwrap();
    let service = builder.declare("PageService").unwrap();
    builder.edit(service).property(Property::marked(tracer, marker));
    let universe = builder.finish().unwrap();

    // the root never opts into the marker
    let root = RootDescriptor::new(provider)
        .provide(Candidate::self_typed(service, ServiceLifetime::Transient));

    let sink = DiagnosticsSink::new();
    let plan = GraphResolver::new(&universe, &[]).resolve(&root, &sink).unwrap();
    let svc = plan.service_for_identity(&ServiceKey::unkeyed(service)).unwrap();
    assert!(svc.dependencies.is_empty());
}

#[test]
fn inherited_properties_are_collected_from_the_base_chain() {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("AppProvider").unwrap();
    let marker = builder.declare_interface("InjectAttribute").unwrap();
    let tracer = builder.declare("Tracer").unwrap();
    let metrics = builder.declare("Metrics").unwrap();
    let base = builder.declare_interface("PageBase").unwrap();
    let page = builder.declare("HomePage").unwrap();
    builder.edit(base).property(Property::marked(metrics, marker));
    builder
        .edit(page)
        .base(base)
        .property(Property::marked(tracer, marker));
    let universe = builder.finish().unwrap();

    let root = RootDescriptor::new(provider)
        .provide(Candidate::self_typed(tracer, ServiceLifetime::Singleton))
        .provide(Candidate::self_typed(metrics, ServiceLifetime::Singleton))
        .provide(Candidate::self_typed(page, ServiceLifetime::Transient))
        .property_marker(marker);

    let sink = DiagnosticsSink::new();
    let plan = GraphResolver::new(&universe, &[]).resolve(&root, &sink).unwrap();
    let svc = plan.service_for_identity(&ServiceKey::unkeyed(page)).unwrap();
    // own properties first, then the base chain's
    assert_eq!(
        svc.dependencies.as_slice(),
        &[
            DependencyRef::Single(ServiceKey::unkeyed(tracer)),
            DependencyRef::Single(ServiceKey::unkeyed(metrics)),
        ]
    );
}

#[test]
fn property_targets_join_the_dependency_closure() {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("AppProvider").unwrap();
    let marker = builder.declare_interface("InjectAttribute").unwrap();
    let tracer = builder.declare("Tracer").unwrap();
    let page = builder.declare("HomePage").unwrap();
    builder.edit(page).property(Property::marked(tracer, marker));
    let universe = builder.finish().unwrap();

    // Tracer arrives only through the property edge
    let described = vec![Candidate::self_typed(tracer, ServiceLifetime::Singleton)];
    let root = RootDescriptor::new(provider)
        .provide(Candidate::self_typed(page, ServiceLifetime::Transient))
        .property_marker(marker);

    let sink = DiagnosticsSink::new();
    let plan = GraphResolver::new(&universe, &described).resolve(&root, &sink).unwrap();
    assert_eq!(plan.len(), 2);
    assert!(plan.service_for_identity(&ServiceKey::unkeyed(tracer)).is_some());
}

#[test]
fn collection_valued_properties_expand_like_parameters() {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("AppProvider").unwrap();
    let marker = builder.declare_interface("InjectAttribute").unwrap();
    let handler = builder.declare_interface("IHandler").unwrap();
    let a = builder.declare("HandlerA").unwrap();
    let b = builder.declare("HandlerB").unwrap();
    let hub = builder.declare("Hub").unwrap();
    builder.edit(a).implements(handler);
    builder.edit(b).implements(handler);
    builder
        .edit(hub)
        .property(Property::marked_collection(handler, marker));
    let universe = builder.finish().unwrap();

    let root = RootDescriptor::new(provider)
        .provide(Candidate::new(handler, a, ServiceLifetime::Singleton))
        .provide(Candidate::new(handler, b, ServiceLifetime::Singleton))
        .provide(Candidate::self_typed(hub, ServiceLifetime::Singleton))
        .property_marker(marker);

    let sink = DiagnosticsSink::new();
    let plan = GraphResolver::new(&universe, &[]).resolve(&root, &sink).unwrap();
    let svc = plan.service_for_identity(&ServiceKey::unkeyed(hub)).unwrap();
    assert_eq!(
        svc.dependencies.as_slice(),
        &[DependencyRef::Collection(ServiceKey::unkeyed(handler))]
    );
    assert_eq!(plan.collection_for(&ServiceKey::unkeyed(handler)).len(), 2);
}
