//! Compile-time dependency-injection graph resolution.
//!
//! `wireplan` turns declared service candidates into validated construction
//! plans for source-generated containers. A discovery front end loads the
//! host program's types into a [`SymbolUniverse`], describes what each root
//! provides with [`Candidate`]s and [`RootDescriptor`]s, and runs a
//! [`GraphResolver`] pass per root. The output is a [`ResolvedPlan`]: every
//! reachable service with its lifetime, its selected constructor's
//! dependency list, its disposal capability, and the orderings an emitter
//! needs to generate registration and wiring code. Nothing here executes at
//! the host program's runtime; resolution happens entirely at build time.
//!
//! Resolution is deliberately forgiving in shape and strict in outcome:
//! constructor selection is greedy toward the richest satisfiable signature,
//! multiple candidates may share a binding (collections and priority-based
//! primary selection give the group meaning), and every failure in a root is
//! reported through the shared [`DiagnosticsSink`] before the root is
//! declared failed. A failed root yields no plan at all; sibling roots are
//! unaffected.
//!
//! # Quick start
//!
//! ```rust
//! use wireplan::{
//!     Candidate, DiagnosticsSink, GraphResolver, Parameter, RootDescriptor,
//!     ServiceKey, ServiceLifetime, SymbolUniverse,
//! };
//!
//! // Describe the types the front end discovered.
//! let mut builder = SymbolUniverse::builder();
//! let provider = builder.declare("AppProvider")?;
//! let logger = builder.declare_interface("ILogger")?;
//! let console = builder.declare("ConsoleLogger")?;
//! let service = builder.declare("UserService")?;
//! builder.edit(console).implements(logger);
//! builder.edit(service).ctor(vec![Parameter::of(logger)]);
//! let universe = builder.finish()?;
//!
//! // Describe what the root provides, then resolve.
//! let root = RootDescriptor::new(provider)
//!     .provide(Candidate::new(logger, console, ServiceLifetime::Singleton))
//!     .provide(Candidate::self_typed(service, ServiceLifetime::Transient));
//!
//! let resolver = GraphResolver::new(&universe, &[]);
//! let sink = DiagnosticsSink::new();
//! let plan = resolver.resolve(&root, &sink).ok_or("resolution failed")?;
//!
//! assert_eq!(plan.len(), 2);
//! let primary = plan.primary_for(&ServiceKey::unkeyed(logger)).unwrap();
//! assert_eq!(universe.name(primary.implementation_type), "ConsoleLogger");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Feature flags
//!
//! - `plan-export`: serde-backed plan serialization ([`PlanGraph`]) with
//!   JSON, DOT, and Mermaid renderers.

mod descriptors;
mod diagnostics;
mod error;
mod extract;
mod index;
mod key;
mod lifetime;
mod observer;
mod plan;
#[cfg(feature = "plan-export")]
mod plan_export;
mod resolver;
mod symbol;

pub use descriptors::{Candidate, FactoryRef, RootDescriptor};
pub use diagnostics::{
    Diagnostic, DiagnosticsSink, DUPLICATE_SERVICE_CODE, MISSING_SERVICE_CODE,
};
pub use error::{ModelError, ModelResult};
pub use extract::MissingDependencies;
pub use index::CandidateIndex;
pub use key::ServiceKey;
pub use lifetime::ServiceLifetime;
pub use observer::{LoggingObserver, MetricsObserver, ResolveObserver};
pub use plan::{DependencyList, DependencyRef, ResolvedPlan, ResolvedService, Selection};
#[cfg(feature = "plan-export")]
pub use plan_export::{PlanEdge, PlanGraph, PlanNode};
pub use resolver::GraphResolver;
pub use symbol::{
    Constructor, DisposeKind, Parameter, Property, SourceLocation, Symbol, SymbolEdit, SymbolId,
    SymbolUniverse, UniverseBuilder,
};
