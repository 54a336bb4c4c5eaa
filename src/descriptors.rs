//! Declaration model: candidates and root descriptors.
//!
//! A [`Candidate`] is a potential binding before resolution confirms its
//! dependencies are satisfiable; a [`RootDescriptor`] is the entry point
//! whose declared and included services seed one resolution pass. Both are
//! plain immutable data handed to the resolver by the discovery front end.

use std::sync::Arc;

use crate::key::ServiceKey;
use crate::lifetime::ServiceLifetime;
use crate::symbol::SymbolId;

/// Reference to a user-supplied construction function.
///
/// A factory is a black box to the resolver: the implementation's
/// constructors are not inspected and the candidate contributes no graph
/// dependencies. The factory may itself ask the emitter to pass it the
/// provider handle and/or the active service key; those are wiring concerns,
/// recorded here so the emitter knows the factory's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryRef {
    /// Name of the factory function on the root type
    pub name: Arc<str>,
    /// Factory takes the provider handle as a parameter
    pub takes_provider: bool,
    /// Factory takes the active key value as a parameter
    pub takes_key: bool,
}

impl FactoryRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            takes_provider: false,
            takes_key: false,
        }
    }

    /// Marks the factory as taking the provider handle.
    pub fn with_provider(mut self) -> Self {
        self.takes_provider = true;
        self
    }

    /// Marks the factory as taking the active key value.
    pub fn with_key(mut self) -> Self {
        self.takes_key = true;
        self
    }
}

/// A potential service binding.
///
/// Candidates come from three sources: explicit provides on a root
/// descriptor, self-described declarations attached to implementation types
/// anywhere in the universe, and include rules that synthesize roots from
/// type-family membership. They are immutable once constructed; a fresh
/// resolution pass gathers them again from scratch.
///
/// # Examples
///
/// ```rust
/// use wireplan::{Candidate, ServiceLifetime, SymbolUniverse};
///
/// let mut builder = SymbolUniverse::builder();
/// let ilogger = builder.declare_interface("ILogger").unwrap();
/// let console = builder.declare("ConsoleLogger").unwrap();
///
/// let candidate = Candidate::new(ilogger, console, ServiceLifetime::Singleton)
///     .with_key("console")
///     .with_priority(10);
/// assert_eq!(candidate.binding().key(), Some("console"));
/// assert_eq!(candidate.identity().symbol, console);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Identity this binding is looked up under
    pub interface_type: SymbolId,
    /// Concrete type to construct
    pub implementation_type: SymbolId,
    pub lifetime: ServiceLifetime,
    /// Optional discriminator; `None` is a distinct binding from any key
    pub key: Option<Arc<str>>,
    /// User-supplied construction function, if any
    pub custom_factory: Option<FactoryRef>,
    /// Primary-selection rank; defaults to 0, highest wins
    pub priority: i32,
    /// Self-described candidate pinned to one specific root's provides
    pub provide_to: Option<SymbolId>,
}

impl Candidate {
    /// A binding of `implementation_type` under the contract
    /// `interface_type`.
    pub fn new(
        interface_type: SymbolId,
        implementation_type: SymbolId,
        lifetime: ServiceLifetime,
    ) -> Self {
        Self {
            interface_type,
            implementation_type,
            lifetime,
            key: None,
            custom_factory: None,
            priority: 0,
            provide_to: None,
        }
    }

    /// A binding of a type under its own identity.
    pub fn self_typed(implementation_type: SymbolId, lifetime: ServiceLifetime) -> Self {
        Self::new(implementation_type, implementation_type, lifetime)
    }

    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_factory(mut self, factory: FactoryRef) -> Self {
        self.custom_factory = Some(factory);
        self
    }

    /// Pins this self-described candidate to a single root's direct
    /// provides.
    pub fn provide_to(mut self, root: SymbolId) -> Self {
        self.provide_to = Some(root);
        self
    }

    /// The (interface, key) pair this candidate is resolved under.
    pub fn binding(&self) -> ServiceKey {
        ServiceKey::with_key(self.interface_type, self.key.clone())
    }

    /// The (implementation, key) pair that uniquely identifies the resolved
    /// service.
    pub fn identity(&self) -> ServiceKey {
        ServiceKey::with_key(self.implementation_type, self.key.clone())
    }
}

/// The entry point of one resolution pass.
///
/// A root descriptor carries its directly-provided candidates, the bindings
/// deliberately left to an external collection registration, the include
/// rules that pull whole type families into the graph, and the property
/// markers that opt properties into injection.
#[derive(Debug, Clone)]
pub struct RootDescriptor {
    /// Identity of the provider/builder type being generated for
    pub symbol: SymbolId,
    /// Seed every self-described candidate in the universe
    pub include_all_services: bool,
    /// Candidates declared directly on this root
    pub provides: Vec<Candidate>,
    /// Bindings satisfied externally; never expanded, always valid
    pub provided_by_collection: Vec<ServiceKey>,
    /// Roots synthesized from every non-abstract implementor of an interface
    pub include_interface_implementors: Vec<SymbolId>,
    /// Roots synthesized from every non-abstract inheritor of a base class
    pub include_class_inheritors: Vec<SymbolId>,
    /// Roots named directly; their dependency closure is pulled in
    pub include_dependencies: Vec<SymbolId>,
    /// Marker attributes enabling property injection
    pub property_markers: Vec<SymbolId>,
}

impl RootDescriptor {
    pub fn new(symbol: SymbolId) -> Self {
        Self {
            symbol,
            include_all_services: false,
            provides: Vec::new(),
            provided_by_collection: Vec::new(),
            include_interface_implementors: Vec::new(),
            include_class_inheritors: Vec::new(),
            include_dependencies: Vec::new(),
            property_markers: Vec::new(),
        }
    }

    /// Adds a directly-provided candidate.
    pub fn provide(mut self, candidate: Candidate) -> Self {
        self.provides.push(candidate);
        self
    }

    /// Seeds the pass with every self-described candidate in the universe.
    pub fn include_all(mut self) -> Self {
        self.include_all_services = true;
        self
    }

    /// Declares a binding as satisfied by an external collection
    /// registration.
    pub fn provided_by_collection(mut self, binding: ServiceKey) -> Self {
        self.provided_by_collection.push(binding);
        self
    }

    /// Pulls in every non-abstract implementor of `iface` as a root.
    pub fn include_implementors_of(mut self, iface: SymbolId) -> Self {
        self.include_interface_implementors.push(iface);
        self
    }

    /// Pulls in every non-abstract inheritor of `class` as a root.
    pub fn include_inheritors_of(mut self, class: SymbolId) -> Self {
        self.include_class_inheritors.push(class);
        self
    }

    /// Pulls in `symbol` and its dependency closure as a root.
    pub fn include_dependency(mut self, symbol: SymbolId) -> Self {
        self.include_dependencies.push(symbol);
        self
    }

    /// Enables property injection for properties carrying `marker`.
    pub fn property_marker(mut self, marker: SymbolId) -> Self {
        self.property_markers.push(marker);
        self
    }
}
