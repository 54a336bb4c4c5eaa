//! Service lifetime definitions.

/// Service lifetimes controlling instance caching in emitted containers
///
/// The lifetime does not change how the graph is resolved; it is carried
/// through to the emitter, which uses it to decide field generation and
/// caching policy (singletons and scoped services get backing fields,
/// transients are constructed on every resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceLifetime {
    /// New instance per resolution, never cached
    Transient,
    /// Single instance per root provider, cached forever
    Singleton,
    /// Single instance per scope, cached for the scope lifetime
    Scoped,
}

impl ServiceLifetime {
    /// Display name used in diagnostics and plan exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLifetime::Transient => "Transient",
            ServiceLifetime::Singleton => "Singleton",
            ServiceLifetime::Scoped => "Scoped",
        }
    }
}

impl std::fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
