//! Error types shared across the WikiQA crates.

use thiserror::Error;

/// Errors that can occur during retrieval.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The query is empty: no query text and no keywords.
    ///
    /// This is the only error surfaced to callers by the orchestrator for a
    /// well-configured engine; all stage-level failures degrade to empty
    /// stage output instead.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A collaborator row could not be normalized into a canonical record.
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// An error from the term index backend.
    #[error("Term index error ({backend}): {message}")]
    TermIndex {
        /// The term index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error from the vector index backend.
    #[error("Vector index error ({backend}): {message}")]
    VectorIndex {
        /// The vector index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error during keyword extraction.
    #[error("Keyword extraction error: {0}")]
    KeywordExtraction(String),

    /// The corpus snapshot could not be read.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
