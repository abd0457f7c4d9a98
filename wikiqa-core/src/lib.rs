//! Core contracts for the WikiQA retrieval engine.
//!
//! This crate provides:
//! - The canonical data model: [`Record`], [`Candidate`], [`Query`]
//! - The normalization boundary for loosely-shaped collaborator rows
//! - Collaborator trait contracts (term index, vector index, embeddings,
//!   keyword extraction, corpus snapshots)
//! - The shared [`RetrievalError`] type

mod collaborators;
mod error;
mod normalize;
mod record;

pub use collaborators::{
    CorpusProvider, EmbeddingProvider, KeywordExtractor, TermHit, TermIndex, VectorHit,
    VectorIndex,
};
pub use error::{RetrievalError, Result};
pub use normalize::{normalize_record, normalize_records};
pub use record::{Candidate, MatchSource, Query, Record};
