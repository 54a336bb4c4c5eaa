//! Batch diagnostics collected across resolution passes.
//!
//! A pass never aborts on the first failure: every unsatisfiable service in
//! a root is reported before the root is declared failed, and a failed root
//! never stops sibling roots from resolving. The sink is shared across
//! passes and safe to report into concurrently.

use std::sync::Mutex;

use crate::extract::MissingDependencies;
use crate::key::ServiceKey;
use crate::symbol::{SourceLocation, SymbolId, SymbolUniverse};

/// Stable code for a service whose dependencies cannot be satisfied.
pub const MISSING_SERVICE_CODE: &str = "WP0001";
/// Stable code for conflicting providers of one binding.
pub const DUPLICATE_SERVICE_CODE: &str = "WP0002";

/// One resolution failure, attributed to the root whose pass produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A reachable type's richest constructor has parameters no candidate
    /// satisfies
    MissingService {
        root: SymbolId,
        requesting_type: SymbolId,
        missing: Vec<ServiceKey>,
        location: Option<SourceLocation>,
    },
    /// More than one candidate claims exclusive ownership of a binding
    DuplicateService {
        root: SymbolId,
        conflicting: Vec<SymbolId>,
    },
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::MissingService { .. } => MISSING_SERVICE_CODE,
            Diagnostic::DuplicateService { .. } => DUPLICATE_SERVICE_CODE,
        }
    }

    /// The root whose pass reported this diagnostic.
    pub fn root(&self) -> SymbolId {
        match self {
            Diagnostic::MissingService { root, .. } => *root,
            Diagnostic::DuplicateService { root, .. } => *root,
        }
    }

    /// Source position the diagnostic points at, when one is known.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Diagnostic::MissingService { location, .. } => location.as_ref(),
            Diagnostic::DuplicateService { .. } => None,
        }
    }

    /// Renders the human-readable message against `universe`.
    pub fn message(&self, universe: &SymbolUniverse) -> String {
        match self {
            Diagnostic::MissingService {
                root,
                requesting_type,
                missing,
                ..
            } => {
                let wanted: Vec<String> =
                    missing.iter().map(|b| universe.display_binding(b)).collect();
                format!(
                    "provide required services '{}' for type '{}' to generate '{}'",
                    wanted.join(", "),
                    universe.name(*requesting_type),
                    universe.name(*root),
                )
            }
            Diagnostic::DuplicateService { root, conflicting } => {
                let types: Vec<&str> =
                    conflicting.iter().map(|t| universe.name(*t)).collect();
                format!(
                    "conflicting providers '{}' for a singular binding in '{}'",
                    types.join(", "),
                    universe.name(*root),
                )
            }
        }
    }
}

/// Thread-safe collector shared by every pass of one invocation.
#[derive(Debug, Default)]
pub struct DiagnosticsSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Diagnostics attributed to `root`.
    pub fn for_root(&self, root: SymbolId) -> Vec<Diagnostic> {
        self.entries()
            .into_iter()
            .filter(|d| d.root() == root)
            .collect()
    }

    pub fn has_errors_for(&self, root: SymbolId) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .any(|d| d.root() == root)
    }
}

/// Per-pass reporting handle: forwards to the shared sink and remembers
/// whether this pass has failed.
pub(crate) struct DiagnosticReporter<'a> {
    sink: &'a DiagnosticsSink,
    root: SymbolId,
    has_error: std::cell::Cell<bool>,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new(sink: &'a DiagnosticsSink, root: SymbolId) -> Self {
        Self {
            sink,
            root,
            has_error: std::cell::Cell::new(false),
        }
    }

    pub fn has_error(&self) -> bool {
        self.has_error.get()
    }

    pub fn report_missing_services(&self, missing: MissingDependencies) {
        self.has_error.set(true);
        self.sink.report(Diagnostic::MissingService {
            root: self.root,
            requesting_type: missing.requesting_type,
            missing: missing.missing,
            location: missing.location,
        });
    }

    pub fn report_duplicate_service(&self, conflicting: Vec<SymbolId>) {
        self.has_error.set(true);
        self.sink.report(Diagnostic::DuplicateService {
            root: self.root,
            conflicting,
        });
    }
}
