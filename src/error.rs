//! Error types shared by every collection in the crate.

/// Errors raised by the collections in this crate.
///
/// Every fallible operation reports the problem immediately and leaves the
/// collection unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// An index fell outside `[0, length)`.
    #[error("invalid index {index} for length {length}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The declared length of the collection.
        length: usize,
    },

    /// Parallel index and value arrays had different lengths.
    #[error("different number of indices ({indices}) and values ({values})")]
    LengthMismatch {
        /// Number of indices supplied.
        indices: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Sparse indices were not strictly increasing.
    #[error("indices must be sorted and unique, given {previous} and {next}")]
    UnsortedIndices {
        /// The earlier index.
        previous: usize,
        /// The index that followed it.
        next: usize,
    },

    /// A bounded collection was asked to hold no elements.
    #[error("bound must be positive, given {bound}")]
    InvalidBound {
        /// The rejected bound.
        bound: usize,
    },

    /// A counter was asked to add a count of zero.
    #[error("count must be positive")]
    NonPositiveCount,

    /// Pairs given to a bidirectional map were not one-to-one.
    #[error("mapping is not bijective: {pairs} pairs over {keys} distinct keys and {values} distinct values")]
    NotBijective {
        /// Number of pairs supplied.
        pairs: usize,
        /// Number of distinct keys.
        keys: usize,
        /// Number of distinct values.
        values: usize,
    },
}

/// Result type for collection operations.
pub type Result<T> = core::result::Result<T, CollectionError>;
