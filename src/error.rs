//! Error types for chunkd.

/// Errors that can occur while configuring or running a chunker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap must leave room for new content in every chunk.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The configured chunk size.
        size: usize,
        /// The overlap that was too large.
        overlap: usize,
    },

    /// The separator list must end with `""` so splitting always makes progress.
    #[error("separator list must end with the empty string")]
    MissingTerminalSeparator,

    /// Minimum chunk size cannot exceed the average target.
    #[error("min chunk size {min} exceeds average chunk size {avg}")]
    MinExceedsAvg {
        /// The configured minimum chunk size.
        min: usize,
        /// The configured average chunk size.
        avg: usize,
    },

    /// The embedding provider failed; the semantic chunker cannot proceed.
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// The provider returned the wrong number of vectors for a batch.
    #[error("embedding batch returned {actual} vectors for {expected} inputs")]
    EmbeddingCount {
        /// How many inputs were sent.
        expected: usize,
        /// How many vectors came back.
        actual: usize,
    },

    /// Vectors in one batch disagreed on dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the first vector in the batch.
        expected: usize,
        /// The dimension that disagreed.
        actual: usize,
    },

    /// Required configuration was absent at startup.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// JSON encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for chunkd operations.
pub type Result<T> = std::result::Result<T, Error>;
