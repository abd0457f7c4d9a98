//! Caching decorators for the upstream query-preparation collaborators.
//!
//! Keyword extraction and query embedding are the two per-request
//! collaborator calls worth caching: identical queries recur and both
//! calls are comparatively expensive. The caches are plain decorators
//! over the collaborator traits — the host application constructs them,
//! owns their lifecycle, and injects them like any other collaborator.
//! There is no process-global cache state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use wikiqa_core::{EmbeddingProvider, KeywordExtractor, Result};

/// Capacity and expiry policy for a collaborator cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Maximum number of cached entries before eviction.
    pub max_entries: u64,
    /// Time-to-live for each entry.
    pub ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self { max_entries: 10_000, ttl: Duration::from_secs(600) }
    }
}

impl CachePolicy {
    fn build_cache<V: Clone + Send + Sync + 'static>(&self) -> Cache<String, V> {
        Cache::builder().max_capacity(self.max_entries).time_to_live(self.ttl).build()
    }
}

/// A [`KeywordExtractor`] decorator that caches extraction results.
///
/// Errors are not cached: a failed extraction is retried on the next call.
pub struct CachedKeywordExtractor {
    inner: Arc<dyn KeywordExtractor>,
    cache: Cache<String, Vec<String>>,
}

impl CachedKeywordExtractor {
    /// Wrap an extractor with a cache using the given policy.
    pub fn new(inner: Arc<dyn KeywordExtractor>, policy: CachePolicy) -> Self {
        Self { inner, cache: policy.build_cache() }
    }
}

#[async_trait]
impl KeywordExtractor for CachedKeywordExtractor {
    async fn extract(&self, query: &str) -> Result<Vec<String>> {
        if let Some(keywords) = self.cache.get(query).await {
            return Ok(keywords);
        }
        let keywords = self.inner.extract(query).await?;
        self.cache.insert(query.to_string(), keywords.clone()).await;
        Ok(keywords)
    }
}

/// An [`EmbeddingProvider`] decorator that caches embeddings by input text.
pub struct CachedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Cache<String, Vec<f32>>,
}

impl CachedEmbeddingProvider {
    /// Wrap a provider with a cache using the given policy.
    pub fn new(inner: Arc<dyn EmbeddingProvider>, policy: CachePolicy) -> Self {
        Self { inner, cache: policy.build_cache() }
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(embedding) = self.cache.get(text).await {
            return Ok(embedding);
        }
        let embedding = self.inner.embed(text).await?;
        self.cache.insert(text.to_string(), embedding.clone()).await;
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}
