//! Error types for symbol model construction.

use std::fmt;

/// Errors raised while assembling a [`SymbolUniverse`](crate::SymbolUniverse).
///
/// Resolution itself never returns these: missing bindings and provider
/// conflicts are batch-reported through the
/// [`DiagnosticsSink`](crate::DiagnosticsSink) so a single pass can surface
/// every independent problem at once. `ModelError` only covers malformed
/// input to the universe builder.
///
/// # Examples
///
/// ```rust
/// use wireplan::{ModelError, SymbolUniverse};
///
/// let mut builder = SymbolUniverse::builder();
/// builder.declare("Database").unwrap();
/// match builder.declare("Database") {
///     Err(ModelError::DuplicateSymbol(name)) => assert_eq!(&*name, "Database"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ModelError {
    /// A symbol name was declared more than once
    DuplicateSymbol(Box<str>),
    /// A symbol id references no declared symbol
    UnknownSymbol(u32),
    /// A symbol's base-type chain loops back on itself
    CyclicBase(Box<str>),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::DuplicateSymbol(name) => write!(f, "Symbol declared twice: {}", name),
            ModelError::UnknownSymbol(id) => write!(f, "Unknown symbol id: {}", id),
            ModelError::CyclicBase(name) => {
                write!(f, "Cyclic base-type chain through: {}", name)
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Result type for universe construction
pub type ModelResult<T> = Result<T, ModelError>;
