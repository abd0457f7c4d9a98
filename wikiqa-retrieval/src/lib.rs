//! Hybrid retrieval engine for question answering over internal wiki pages.
//!
//! This crate provides:
//! - Title, label, lexical, and vector match stages over a corpus snapshot
//! - Candidate aggregation with weighted rank fusion and de-duplication
//! - The [`Retriever`] orchestrator with an exact-title early exit and a
//!   concurrent, failure-isolated stage fan-out
//! - Caching decorators for the keyword-extraction and embedding
//!   collaborators
//! - In-memory reference backends for development and testing
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wikiqa_core::Query;
//! use wikiqa_retrieval::{
//!     InMemoryCorpus, InMemoryTermIndex, InMemoryVectorIndex, RetrievalConfig, Retriever,
//! };
//!
//! let corpus = Arc::new(InMemoryCorpus::new(records.clone()));
//! let term_index = Arc::new(InMemoryTermIndex::from_records(&records).await);
//! let vector_index = Arc::new(InMemoryVectorIndex::from_records(&records).await);
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .corpus(corpus)
//!     .term_index(term_index)
//!     .vector_index(vector_index)
//!     .build()?;
//!
//! let query = Query::new("Member Withdrawal Feature", keywords, embedding);
//! let candidates = retriever.retrieve(&query).await?;
//! ```

mod cache;
mod config;
pub mod fusion;
mod inmemory;
mod retriever;
pub mod similarity;
pub mod stages;
pub mod vecmath;

pub use cache::{CachePolicy, CachedEmbeddingProvider, CachedKeywordExtractor};
pub use config::{DedupKey, FusionWeights, RetrievalConfig, RetrievalConfigBuilder};
pub use inmemory::{InMemoryCorpus, InMemoryTermIndex, InMemoryVectorIndex};
pub use retriever::{Retriever, RetrieverBuilder};
