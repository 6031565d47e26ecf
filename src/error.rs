//! Error taxonomy for the knowledge engine.
//!
//! Every failure surfaced by [`crate::knowledge::KnowledgeBase`] is one of four
//! kinds, so callers can tell "bad input" from "dependency down" from "some
//! partitions answered and some did not". None of them poison the engine; the
//! next call starts clean.

pub type Result<T, E = KnowledgeError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// Malformed scope / entity type, or an empty required field. Never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding service could not be reached, timed out, or answered garbage.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The vector store rejected or failed a read or write.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Some partitions of a fan-out answered while others failed.
    #[error(
        "partial partition failure: {} of {} partitions failed ({})",
        failed.len(),
        failed.len() + succeeded,
        failed.join("; ")
    )]
    PartialPartitionFailure {
        /// One `"<partition>: <reason>"` entry per failed partition.
        failed: Vec<String>,
        /// Number of partitions that answered successfully.
        succeeded: usize,
    },
}

impl KnowledgeError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Stable machine-readable kind, used in tool responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::EmbeddingUnavailable(_) => "embedding_unavailable",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::PartialPartitionFailure { .. } => "partial_partition_failure",
        }
    }
}
