use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wireplan::{
    Candidate, DiagnosticsSink, GraphResolver, Parameter, RootDescriptor, ServiceLifetime,
    SymbolUniverse,
};

/// Layered universe: each service depends on the one before it, forcing the
/// worklist to walk the full chain.
fn chain_fixture(depth: usize) -> (SymbolUniverse, RootDescriptor) {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("Provider").unwrap();
    let mut previous = None;
    let mut ids = Vec::with_capacity(depth);
    for i in 0..depth {
        let id = builder.declare(&format!("Service{}", i)).unwrap();
        if let Some(prev) = previous {
            builder.edit(id).ctor(vec![Parameter::of(prev)]);
        }
        ids.push(id);
        previous = Some(id);
    }
    let universe = builder.finish().unwrap();

    let mut root = RootDescriptor::new(provider);
    for id in ids {
        root = root.provide(Candidate::self_typed(id, ServiceLifetime::Singleton));
    }
    (universe, root)
}

/// Fan-out universe: one interface with many implementations plus a
/// collection consumer, exercising grouping and primary selection.
fn fanout_fixture(width: usize) -> (SymbolUniverse, RootDescriptor) {
    let mut builder = SymbolUniverse::builder();
    let provider = builder.declare("Provider").unwrap();
    let handler = builder.declare_interface("IHandler").unwrap();
    let dispatcher = builder.declare("Dispatcher").unwrap();
    builder.edit(dispatcher).ctor(vec![Parameter::collection(handler)]);

    let mut root = RootDescriptor::new(provider)
        .provide(Candidate::self_typed(dispatcher, ServiceLifetime::Singleton));
    for i in 0..width {
        let id = builder.declare(&format!("Handler{}", i)).unwrap();
        builder.edit(id).implements(handler);
        root = root.provide(
            Candidate::new(handler, id, ServiceLifetime::Transient).with_priority(i as i32),
        );
    }
    (builder.finish().unwrap(), root)
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_chain");
    for depth in [10usize, 100, 500] {
        let (universe, root) = chain_fixture(depth);
        let resolver = GraphResolver::new(&universe, &[]);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let sink = DiagnosticsSink::new();
                black_box(resolver.resolve(&root, &sink))
            })
        });
    }
    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_fanout");
    for width in [10usize, 100] {
        let (universe, root) = fanout_fixture(width);
        let resolver = GraphResolver::new(&universe, &[]);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| {
                let sink = DiagnosticsSink::new();
                black_box(resolver.resolve(&root, &sink))
            })
        });
    }
    group.finish();
}

fn bench_selections(c: &mut Criterion) {
    let (universe, root) = fanout_fixture(100);
    let resolver = GraphResolver::new(&universe, &[]);
    let sink = DiagnosticsSink::new();
    let plan = resolver.resolve(&root, &sink).unwrap();
    c.bench_function("plan_selections_100", |b| {
        b.iter(|| black_box(plan.selections()))
    });
}

criterion_group!(benches, bench_chain, bench_fanout, bench_selections);
criterion_main!(benches);
