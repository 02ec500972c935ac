//! Error types for logged container operations.

use alc_types::ValueKind;
use thiserror::Error;

/// Errors raised by logged container operations.
///
/// All errors are local and synchronous: they are raised at the point of the
/// offending operation and propagate to the caller unchanged. No operation
/// leaves a container partially mutated.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Explicit key lookup or removal on an absent mapping key.
    #[error("no such key: {key:?}")]
    KeyNotFound { key: String },

    /// Attribute-style lookup on an absent mapping key.
    #[error("no such configuration attribute: {attr:?}")]
    AttributeNotFound { attr: String },

    /// Sequence index past the end of the container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The value is not present in the container.
    #[error("value not found: {value}")]
    ValueNotFound { value: String },

    /// Popping from an empty collection.
    #[error("cannot pop from an empty collection")]
    CollectionEmpty,

    /// A container-shaped value cannot enter a set.
    #[error("unhashable {kind} value cannot enter a set")]
    NotHashable { kind: ValueKind },
}

/// Convenience type alias for logged container operations.
pub type Result<T> = std::result::Result<T, TreeError>;
