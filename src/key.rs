//! Composite service keys for binding lookup.

use std::sync::Arc;

use crate::symbol::SymbolId;

/// Key for binding storage and lookup.
///
/// A binding is identified by a symbol plus an optional string key, so two
/// candidates registered under the same interface but different keys are
/// distinct bindings ("keyed services"). The absence of a key is itself a
/// distinct binding from any key value: a candidate keyed `"a"` never
/// satisfies an unkeyed request, and vice versa.
///
/// The same composite shape keys both lookup directions used during
/// resolution: (interface, key) for dependency requests and
/// (implementation, key) for resolved-service identity.
///
/// # Examples
///
/// ```rust
/// use wireplan::{ServiceKey, SymbolUniverse};
///
/// let mut builder = SymbolUniverse::builder();
/// let cache = builder.declare("ICache").unwrap();
///
/// let unkeyed = ServiceKey::unkeyed(cache);
/// let redis = ServiceKey::keyed(cache, "redis");
///
/// assert_ne!(unkeyed, redis);
/// assert_ne!(redis, ServiceKey::keyed(cache, "memory"));
/// assert_eq!(redis, ServiceKey::keyed(cache, "redis"));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceKey {
    /// The symbol this binding is looked up under
    pub symbol: SymbolId,
    /// Optional string discriminator for keyed services
    pub key: Option<Arc<str>>,
}

impl ServiceKey {
    /// Creates an unkeyed binding key for `symbol`.
    #[inline]
    pub fn unkeyed(symbol: SymbolId) -> Self {
        Self { symbol, key: None }
    }

    /// Creates a keyed binding key for `symbol`.
    #[inline]
    pub fn keyed(symbol: SymbolId, key: impl Into<Arc<str>>) -> Self {
        Self { symbol, key: Some(key.into()) }
    }

    /// Creates a binding key with an already-optional key value.
    #[inline]
    pub fn with_key(symbol: SymbolId, key: Option<Arc<str>>) -> Self {
        Self { symbol, key }
    }

    /// Returns the key string for keyed bindings, or `None`.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns `true` if this is a keyed binding.
    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }
}

// Composite equality on the hot resolution path: symbol id first, key
// content second.
impl PartialEq for ServiceKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.key.as_deref() == other.key.as_deref()
    }
}

impl Eq for ServiceKey {}

impl std::hash::Hash for ServiceKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.key.as_deref().hash(state);
    }
}

impl PartialOrd for ServiceKey {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceKey {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.symbol
            .cmp(&other.symbol)
            .then_with(|| self.key.as_deref().cmp(&other.key.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolUniverse;

    #[test]
    fn keyed_and_unkeyed_are_distinct() {
        let mut builder = SymbolUniverse::builder();
        let sym = builder.declare("IFoo").unwrap();

        assert_ne!(ServiceKey::unkeyed(sym), ServiceKey::keyed(sym, "a"));
        assert_ne!(ServiceKey::keyed(sym, "a"), ServiceKey::keyed(sym, "b"));
        assert_eq!(ServiceKey::keyed(sym, "a"), ServiceKey::keyed(sym, "a"));
    }

    #[test]
    fn hash_matches_equality() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut builder = SymbolUniverse::builder();
        let sym = builder.declare("IFoo").unwrap();

        let hash = |k: &ServiceKey| {
            let mut h = DefaultHasher::new();
            k.hash(&mut h);
            h.finish()
        };
        assert_eq!(
            hash(&ServiceKey::keyed(sym, "a")),
            hash(&ServiceKey::keyed(sym, "a"))
        );
        assert_ne!(
            hash(&ServiceKey::keyed(sym, "a")),
            hash(&ServiceKey::unkeyed(sym))
        );
    }
}
