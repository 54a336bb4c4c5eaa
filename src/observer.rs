//! Observation hooks for resolution passes.
//!
//! Hosts embedding the resolver (a build tool, a compiler plugin, a test
//! harness) plug in observers to surface pass progress through whatever
//! channel they own. Observers must be cheap; they run inline on the
//! resolution path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Receives lifecycle events from resolution passes.
///
/// All methods have no-op defaults so implementors only override what they
/// care about.
pub trait ResolveObserver: Send + Sync {
    /// A pass started for the named root.
    fn pass_started(&self, root: &str) {
        let _ = root;
    }

    /// A service was added to the root's plan.
    fn service_resolved(&self, root: &str, implementation: &str) {
        let _ = (root, implementation);
    }

    /// The pass produced a complete plan.
    fn pass_completed(&self, root: &str, resolved: usize, duration: Duration) {
        let _ = (root, resolved, duration);
    }

    /// The pass failed; `diagnostics` is the number of reports it produced.
    fn pass_failed(&self, root: &str, diagnostics: usize) {
        let _ = (root, diagnostics);
    }
}

/// Observer that prints pass milestones to stderr.
#[derive(Debug, Clone, Default)]
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl ResolveObserver for LoggingObserver {
    fn pass_started(&self, root: &str) {
        eprintln!("{}resolving '{}'", self.prefix, root);
    }

    fn pass_completed(&self, root: &str, resolved: usize, duration: Duration) {
        eprintln!(
            "{}resolved '{}': {} services in {:?}",
            self.prefix, root, resolved, duration
        );
    }

    fn pass_failed(&self, root: &str, diagnostics: usize) {
        eprintln!(
            "{}failed '{}': {} diagnostics",
            self.prefix, root, diagnostics
        );
    }
}

/// Observer that counts pass outcomes, for tests and coarse telemetry.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    passes: AtomicUsize,
    services: AtomicUsize,
    failures: AtomicUsize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passes(&self) -> usize {
        self.passes.load(Ordering::Relaxed)
    }

    pub fn services(&self) -> usize {
        self.services.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl ResolveObserver for MetricsObserver {
    fn pass_started(&self, _root: &str) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    fn service_resolved(&self, _root: &str, _implementation: &str) {
        self.services.fetch_add(1, Ordering::Relaxed);
    }

    fn pass_failed(&self, _root: &str, _diagnostics: usize) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Registered observers of one resolver.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolveObserver>>,
}

impl Observers {
    pub fn add(&mut self, observer: Arc<dyn ResolveObserver>) {
        self.observers.push(observer);
    }

    pub fn pass_started(&self, root: &str) {
        for observer in &self.observers {
            observer.pass_started(root);
        }
    }

    pub fn service_resolved(&self, root: &str, implementation: &str) {
        for observer in &self.observers {
            observer.service_resolved(root, implementation);
        }
    }

    pub fn pass_completed(&self, root: &str, resolved: usize, duration: Duration) {
        for observer in &self.observers {
            observer.pass_completed(root, resolved, duration);
        }
    }

    pub fn pass_failed(&self, root: &str, diagnostics: usize) {
        for observer in &self.observers {
            observer.pass_failed(root, diagnostics);
        }
    }
}
