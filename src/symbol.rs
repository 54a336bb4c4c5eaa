//! Symbol model: the host-type-system capability set.
//!
//! Resolution never inspects source text. A discovery front end (a compiler
//! plugin, an AST walker, a test fixture) loads every type it knows about
//! into a [`SymbolUniverse`]: names, implemented interfaces, base types,
//! constructors, injectable properties, disposal capability, obsolescence.
//! The resolver works purely against that immutable snapshot. The
//! snapshot is computed once per invocation and may be shared read-only
//! across concurrent resolution passes.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::{ModelError, ModelResult};
use crate::key::ServiceKey;

/// Opaque identity of a declared type within a [`SymbolUniverse`].
///
/// Ids are only meaningful for the universe that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Index of this symbol within its universe.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source position a diagnostic can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source file path as reported by the front end
    pub file: Arc<str>,
    /// 1-based line number
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        Self { file: file.into(), line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Disposal capability declared by an implementation type.
///
/// Async wins over sync when a type declares both, matching how emitted
/// containers prefer async disposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisposeKind {
    /// No disposal hook
    #[default]
    None,
    /// Synchronous disposal
    Sync,
    /// Asynchronous disposal
    Async,
}

impl DisposeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisposeKind::None => "None",
            DisposeKind::Sync => "Sync",
            DisposeKind::Async => "Async",
        }
    }
}

/// One constructor parameter, already normalized.
///
/// A parameter whose declared type is "collection of T" is stored with
/// `collection: true` and `target` pointing at the element type T; validity
/// and candidate lookup always go through the element binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub target: SymbolId,
    pub collection: bool,
    pub key: Option<Arc<str>>,
}

impl Parameter {
    /// A plain singular dependency on `target`.
    pub fn of(target: SymbolId) -> Self {
        Self { target, collection: false, key: None }
    }

    /// A singular dependency resolved under an explicit key.
    pub fn keyed(target: SymbolId, key: impl Into<Arc<str>>) -> Self {
        Self { target, collection: false, key: Some(key.into()) }
    }

    /// A collection-valued dependency on all candidates bound to `target`.
    pub fn collection(target: SymbolId) -> Self {
        Self { target, collection: true, key: None }
    }

    /// A collection-valued dependency on candidates bound under `key`.
    pub fn collection_keyed(target: SymbolId, key: impl Into<Arc<str>>) -> Self {
        Self { target, collection: true, key: Some(key.into()) }
    }

    /// The (element type, key) binding this parameter is checked against.
    pub fn binding(&self) -> ServiceKey {
        ServiceKey::with_key(self.target, self.key.clone())
    }
}

/// A declared construction path of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub parameters: Vec<Parameter>,
    pub location: Option<SourceLocation>,
}

impl Constructor {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters, location: None }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// A property that may participate in property injection.
///
/// `markers` lists the marker attributes carried by the property; a root
/// descriptor opts into a set of markers, and only properties carrying one
/// of those become injection targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub target: SymbolId,
    pub collection: bool,
    pub markers: Vec<SymbolId>,
}

impl Property {
    pub fn marked(target: SymbolId, marker: SymbolId) -> Self {
        Self { target, collection: false, markers: vec![marker] }
    }

    pub fn marked_collection(target: SymbolId, marker: SymbolId) -> Self {
        Self { target, collection: true, markers: vec![marker] }
    }
}

/// Everything resolution needs to know about one declared type.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: Arc<str>,
    is_abstract: bool,
    interfaces: Vec<SymbolId>,
    base: Option<SymbolId>,
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
    obsolete: bool,
    dispose: DisposeKind,
    location: Option<SourceLocation>,
}

impl Symbol {
    fn new(name: Arc<str>) -> Self {
        Self {
            name,
            is_abstract: false,
            interfaces: Vec::new(),
            base: None,
            constructors: Vec::new(),
            properties: Vec::new(),
            obsolete: false,
            dispose: DisposeKind::None,
            location: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// All interfaces this type implements, flattened by the front end.
    pub fn interfaces(&self) -> &[SymbolId] {
        &self.interfaces
    }

    pub fn base(&self) -> Option<SymbolId> {
        self.base
    }

    /// Declared construction paths; empty means the implicit default
    /// constructor (no dependencies).
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn dispose(&self) -> DisposeKind {
        self.dispose
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}

/// Immutable snapshot of every declared type known to a resolution run.
///
/// Built once through [`SymbolUniverse::builder`], then shared read-only
/// across passes. All symbol ids handed out by the builder index into this
/// snapshot.
///
/// # Examples
///
/// ```rust
/// use wireplan::{Parameter, SymbolUniverse};
///
/// let mut builder = SymbolUniverse::builder();
/// let logger = builder.declare_interface("ILogger").unwrap();
/// let console = builder.declare("ConsoleLogger").unwrap();
/// let service = builder.declare("UserService").unwrap();
/// builder.edit(console).implements(logger);
/// builder.edit(service).ctor(vec![Parameter::of(logger)]);
///
/// let universe = builder.finish().unwrap();
/// assert!(universe.implements(console, logger));
/// assert_eq!(universe.name(service), "UserService");
/// ```
#[derive(Debug, Clone)]
pub struct SymbolUniverse {
    symbols: Vec<Symbol>,
    by_name: AHashMap<Arc<str>, SymbolId>,
}

impl SymbolUniverse {
    /// Starts building a new universe.
    pub fn builder() -> UniverseBuilder {
        UniverseBuilder::new()
    }

    /// Number of declared symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates every declared symbol id in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len() as u32).map(SymbolId)
    }

    /// The symbol record for `id`.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Display name for `id`.
    pub fn name(&self, id: SymbolId) -> &str {
        self.symbols[id.index()].name()
    }

    /// Looks a symbol up by its declared name.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    /// Whether `ty` implements interface `iface`.
    pub fn implements(&self, ty: SymbolId, iface: SymbolId) -> bool {
        self.symbol(ty).interfaces.contains(&iface)
    }

    /// Whether `base` appears anywhere in `ty`'s base-type chain.
    pub fn inherits(&self, ty: SymbolId, base: SymbolId) -> bool {
        let mut current = self.symbol(ty).base;
        while let Some(b) = current {
            if b == base {
                return true;
            }
            current = self.symbol(b).base;
        }
        false
    }

    /// The base-type chain of `ty`, nearest first, excluding `ty` itself.
    pub fn base_chain(&self, ty: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut current = self.symbol(ty).base;
        while let Some(b) = current {
            chain.push(b);
            current = self.symbol(b).base;
        }
        chain
    }

    /// Human-readable rendering of a binding for diagnostics.
    pub fn display_binding(&self, binding: &ServiceKey) -> String {
        match binding.key() {
            Some(key) => format!("{} (key=\"{}\")", self.name(binding.symbol), key),
            None => self.name(binding.symbol).to_string(),
        }
    }
}

/// Builder for [`SymbolUniverse`].
///
/// Declare every symbol first (ids are handed out immediately so they can be
/// cross-referenced), then configure each one through [`UniverseBuilder::edit`].
pub struct UniverseBuilder {
    symbols: Vec<Symbol>,
    by_name: AHashMap<Arc<str>, SymbolId>,
}

impl UniverseBuilder {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            by_name: AHashMap::new(),
        }
    }

    /// Declares a concrete type and returns its id.
    pub fn declare(&mut self, name: &str) -> ModelResult<SymbolId> {
        if self.by_name.contains_key(name) {
            return Err(ModelError::DuplicateSymbol(name.into()));
        }
        let name: Arc<str> = name.into();
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(name.clone()));
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Declares an abstract symbol (an interface or abstract base class).
    pub fn declare_interface(&mut self, name: &str) -> ModelResult<SymbolId> {
        let id = self.declare(name)?;
        self.symbols[id.index()].is_abstract = true;
        Ok(id)
    }

    /// Opens a symbol for configuration.
    pub fn edit(&mut self, id: SymbolId) -> SymbolEdit<'_> {
        SymbolEdit { builder: self, id }
    }

    /// Validates cross-references and seals the universe.
    pub fn finish(self) -> ModelResult<SymbolUniverse> {
        let count = self.symbols.len() as u32;
        let check = |id: SymbolId| -> ModelResult<()> {
            if id.0 < count {
                Ok(())
            } else {
                Err(ModelError::UnknownSymbol(id.0))
            }
        };
        for symbol in &self.symbols {
            for iface in &symbol.interfaces {
                check(*iface)?;
            }
            // walk the whole base chain: a chain longer than the universe
            // must have looped
            let mut current = symbol.base;
            let mut steps = 0usize;
            while let Some(base) = current {
                check(base)?;
                steps += 1;
                if steps > self.symbols.len() {
                    return Err(ModelError::CyclicBase(symbol.name.as_ref().into()));
                }
                current = self.symbols[base.index()].base;
            }
            for ctor in &symbol.constructors {
                for param in &ctor.parameters {
                    check(param.target)?;
                }
            }
            for prop in &symbol.properties {
                check(prop.target)?;
                for marker in &prop.markers {
                    check(*marker)?;
                }
            }
        }
        Ok(SymbolUniverse {
            symbols: self.symbols,
            by_name: self.by_name,
        })
    }
}

impl Default for UniverseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent configuration handle for one declared symbol.
pub struct SymbolEdit<'a> {
    builder: &'a mut UniverseBuilder,
    id: SymbolId,
}

impl SymbolEdit<'_> {
    fn symbol(&mut self) -> &mut Symbol {
        &mut self.builder.symbols[self.id.index()]
    }

    /// Marks the symbol abstract; abstract types are skipped by
    /// implementor/inheritor include rules.
    pub fn abstract_type(mut self) -> Self {
        self.symbol().is_abstract = true;
        self
    }

    /// Records that this type implements `iface` (front ends flatten the
    /// full interface set, including inherited interfaces).
    pub fn implements(mut self, iface: SymbolId) -> Self {
        self.symbol().interfaces.push(iface);
        self
    }

    /// Sets the direct base type.
    pub fn base(mut self, base: SymbolId) -> Self {
        self.symbol().base = Some(base);
        self
    }

    /// Adds a constructor with the given parameter list.
    pub fn ctor(mut self, parameters: Vec<Parameter>) -> Self {
        self.symbol().constructors.push(Constructor::new(parameters));
        self
    }

    /// Adds a constructor with a source location for diagnostics.
    pub fn ctor_at(mut self, parameters: Vec<Parameter>, location: SourceLocation) -> Self {
        self.symbol()
            .constructors
            .push(Constructor::new(parameters).at(location));
        self
    }

    /// Adds an injectable property.
    pub fn property(mut self, property: Property) -> Self {
        self.symbol().properties.push(property);
        self
    }

    /// Flags the symbol as obsolete.
    pub fn obsolete(mut self) -> Self {
        self.symbol().obsolete = true;
        self
    }

    /// Declares the disposal capability of the type.
    pub fn dispose(mut self, kind: DisposeKind) -> Self {
        self.symbol().dispose = kind;
        self
    }

    /// Attaches the type's own source location.
    pub fn located(mut self, location: SourceLocation) -> Self {
        self.symbol().location = Some(location);
        self
    }

    /// The id being edited, for chaining convenience.
    pub fn id(&self) -> SymbolId {
        self.id
    }
}
