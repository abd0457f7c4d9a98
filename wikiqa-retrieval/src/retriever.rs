//! Retrieval orchestrator.
//!
//! The [`Retriever`] sequences the match stages: a synchronous title-exact
//! check with an early-exit short circuit, then a concurrent fan-out of
//! the title-partial, label, lexical, and vector stages behind a join
//! barrier, then rank fusion. Construct one via [`Retriever::builder()`].
//!
//! # Example
//!
//! ```rust,ignore
//! use wikiqa_retrieval::{Retriever, RetrievalConfig};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .corpus(Arc::new(corpus))
//!     .term_index(Arc::new(term_index))
//!     .vector_index(Arc::new(vector_index))
//!     .build()?;
//!
//! let candidates = retriever.retrieve(&query).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use wikiqa_core::{
    Candidate, CorpusProvider, EmbeddingProvider, KeywordExtractor, Query, Record,
    RetrievalError, Result, TermIndex, VectorIndex,
};

use crate::config::RetrievalConfig;
use crate::fusion;
use crate::stages::{label, lexical, title, vector};

/// The hybrid retrieval orchestrator.
///
/// Holds the corpus snapshot provider and the index collaborators; every
/// request takes one snapshot and treats it as an immutable view. No
/// stage failure is fatal: adapters degrade to empty contributions, and
/// the orchestrator always returns a (possibly empty) ranked list unless
/// the query itself is invalid.
pub struct Retriever {
    config: RetrievalConfig,
    corpus: Arc<dyn CorpusProvider>,
    term_index: Arc<dyn TermIndex>,
    vector_index: Arc<dyn VectorIndex>,
    keyword_extractor: Option<Arc<dyn KeywordExtractor>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Run the full retrieval pipeline for a prepared query.
    ///
    /// Returns the fused, de-duplicated top-K candidate list. A request
    /// that matches nothing at any stage returns an empty list, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InvalidQuery`] when the query has neither
    /// text nor keywords, or the corpus error when the snapshot itself
    /// cannot be read. Stage-level failures never propagate.
    pub async fn retrieve(&self, query: &Query) -> Result<Vec<Candidate>> {
        if query.is_empty() {
            return Err(RetrievalError::InvalidQuery(
                "query text and keyword list are both empty".to_string(),
            ));
        }

        let records = self.corpus.snapshot().await.inspect_err(|e| {
            error!(error = %e, "corpus snapshot failed");
        })?;

        let cfg = &self.config;

        // Title-exact runs first and alone: its outcome decides whether the
        // other stages are needed at all.
        let exact = title::search_title_exact(&query.text, &records, cfg.exact_title_threshold);
        if !exact.is_empty() {
            info!(matches = exact.len(), "exact title match, skipping remaining stages");
            return Ok(fusion::fuse(exact, &cfg.weights, cfg.dedup_key, cfg.top_k));
        }

        let lookup: HashMap<&str, &Record> =
            records.iter().map(|r| (r.id.as_str(), r)).collect();
        let stage_timeout = cfg.stage_timeout.min(cfg.overall_timeout);

        let partial_stage = async {
            title::search_title_partial(&query.keywords, &records, cfg.partial_min_match_ratio)
        };
        let label_stage =
            async { label::search_by_label(&query.keywords, &records, cfg.label_min_score) };
        let lexical_stage = async {
            if query.text.trim().is_empty() {
                debug!("query has no text, lexical stage skipped");
                return Vec::new();
            }
            lexical::search_lexical(
                self.term_index.as_ref(),
                &query.text,
                cfg.top_k * cfg.lexical_fetch_multiplier,
                stage_timeout,
                &lookup,
            )
            .await
        };
        let vector_stage = async {
            if query.embedding.is_empty() {
                debug!("query has no embedding, vector stage skipped");
                return Vec::new();
            }
            vector::search_vector(
                self.vector_index.as_ref(),
                &query.embedding,
                cfg.top_k * cfg.vector_fetch_multiplier,
                stage_timeout,
                &lookup,
            )
            .await
        };

        // Join barrier: results are only combined once every fanned-out
        // stage has returned or timed out.
        let (partial, labels, lexical_hits, vector_hits) =
            tokio::join!(partial_stage, label_stage, lexical_stage, vector_stage);

        // Concatenate in stage priority order; first-seen wins on merge.
        let mut candidates = partial;
        candidates.extend(vector_hits);
        candidates.extend(lexical_hits);
        candidates.extend(labels);

        let fused = fusion::fuse(candidates, &cfg.weights, cfg.dedup_key, cfg.top_k);
        info!(result_count = fused.len(), "retrieval completed");
        Ok(fused)
    }

    /// Prepare a [`Query`] from raw text and run [`retrieve`](Self::retrieve).
    ///
    /// Keywords and the query embedding come from the configured
    /// collaborators. A collaborator failure degrades that signal (empty
    /// keywords / skipped vector stage) rather than failing the request.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] when no keyword extractor or
    /// embedding provider is configured, plus everything
    /// [`retrieve`](Self::retrieve) can return.
    pub async fn retrieve_text(&self, text: &str) -> Result<Vec<Candidate>> {
        let extractor = self.keyword_extractor.as_ref().ok_or_else(|| {
            RetrievalError::Config(
                "no keyword extractor configured; use retrieve() with a prepared query"
                    .to_string(),
            )
        })?;
        let embedder = self.embedding_provider.as_ref().ok_or_else(|| {
            RetrievalError::Config(
                "no embedding provider configured; use retrieve() with a prepared query"
                    .to_string(),
            )
        })?;

        let keywords = match extractor.extract(text).await {
            Ok(keywords) => keywords,
            Err(e) => {
                warn!(error = %e, "keyword extraction failed, continuing without keywords");
                Vec::new()
            }
        };
        let embedding = match embedder.embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, vector stage will be skipped");
                Vec::new()
            }
        };

        let query = Query::new(text, keywords, embedding);
        self.retrieve(&query).await
    }
}

/// Builder for constructing a [`Retriever`].
///
/// `config`, `corpus`, `term_index`, and `vector_index` are required;
/// the keyword extractor and embedding provider are only needed for
/// [`Retriever::retrieve_text`].
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrievalConfig>,
    corpus: Option<Arc<dyn CorpusProvider>>,
    term_index: Option<Arc<dyn TermIndex>>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    keyword_extractor: Option<Arc<dyn KeywordExtractor>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RetrieverBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the corpus snapshot provider.
    pub fn corpus(mut self, corpus: Arc<dyn CorpusProvider>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Set the term index backend for the lexical stage.
    pub fn term_index(mut self, index: Arc<dyn TermIndex>) -> Self {
        self.term_index = Some(index);
        self
    }

    /// Set the nearest-neighbor index backend for the vector stage.
    pub fn vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.vector_index = Some(index);
        self
    }

    /// Set an optional keyword extractor for `retrieve_text`.
    pub fn keyword_extractor(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.keyword_extractor = Some(extractor);
        self
    }

    /// Set an optional embedding provider for `retrieve_text`.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Build the [`Retriever`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if any required field is missing.
    pub fn build(self) -> Result<Retriever> {
        let config = self
            .config
            .ok_or_else(|| RetrievalError::Config("config is required".to_string()))?;
        let corpus = self
            .corpus
            .ok_or_else(|| RetrievalError::Config("corpus is required".to_string()))?;
        let term_index = self
            .term_index
            .ok_or_else(|| RetrievalError::Config("term_index is required".to_string()))?;
        let vector_index = self
            .vector_index
            .ok_or_else(|| RetrievalError::Config("vector_index is required".to_string()))?;

        Ok(Retriever {
            config,
            corpus,
            term_index,
            vector_index,
            keyword_extractor: self.keyword_extractor,
            embedding_provider: self.embedding_provider,
        })
    }
}
