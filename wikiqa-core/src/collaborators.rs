//! Collaborator contracts the retrieval engine depends on.
//!
//! The engine owns none of these implementations: the term index, the
//! vector index, embedding generation, keyword extraction, and the corpus
//! snapshot all live behind these traits. Every trait is read-only from
//! the engine's perspective.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::Record;

/// A hit returned by the term index: a record id with its 1-based rank.
///
/// The rank, not the backend's raw score, is what crosses this boundary so
/// that fusion stays scale-independent across backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermHit {
    /// Identifier of the matching record.
    pub record_id: String,
    /// 1-based rank position within the backend's result list.
    pub rank: usize,
}

/// A hit returned by the vector index: a record id with its raw distance.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    /// Identifier of the matching record.
    pub record_id: String,
    /// Distance to the query embedding; lower is more similar. The adapter
    /// does not invert or rescale it — the aggregator owns normalization.
    pub distance: f32,
}

/// A term-based (BM25-style) index queried by the lexical stage.
///
/// May fail independently of the engine; the lexical stage recovers from
/// any error with an empty contribution.
#[async_trait]
pub trait TermIndex: Send + Sync {
    /// Search for up to `limit` records matching the query string,
    /// ordered by descending lexical relevance.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<TermHit>>;
}

/// A nearest-neighbor index queried by the vector stage.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Search for up to `limit` nearest neighbors of the query embedding,
    /// ordered by ascending distance.
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<VectorHit>>;
}

/// A provider that generates vector embeddings from text input.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// A provider that extracts an ordered keyword list from a query string.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Extract keywords from the raw query, in extraction order.
    async fn extract(&self, query: &str) -> Result<Vec<String>>;
}

/// Exposes the materialized record set for in-process title/label matching.
///
/// A snapshot is taken once per request and treated as an immutable view
/// for the request's duration; concurrent ingestion updates must not be
/// observed mid-request (snapshot isolation is the ingestion
/// collaborator's responsibility).
#[async_trait]
pub trait CorpusProvider: Send + Sync {
    /// Return the full record set of the current corpus snapshot.
    async fn snapshot(&self) -> Result<Vec<Record>>;
}
