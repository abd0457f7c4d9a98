//! In-memory reference backends for development and testing.
//!
//! These implement the collaborator contracts over plain collections
//! behind `tokio::sync::RwLock`, mirroring the granularity of the real
//! backends: the corpus provider serves whole-record snapshots, the term
//! index serves rank-ordered hits, and the vector index serves
//! distance-ordered neighbors via brute-force cosine distance.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use wikiqa_core::{
    CorpusProvider, Record, Result, TermHit, TermIndex, VectorHit, VectorIndex,
};

use crate::vecmath::cosine_similarity;

/// A corpus snapshot provider over an in-memory record set.
///
/// `snapshot` clones the current record set, so a running request keeps an
/// immutable view even if `replace` swaps the corpus concurrently.
#[derive(Debug, Default)]
pub struct InMemoryCorpus {
    records: RwLock<Vec<Record>>,
}

impl InMemoryCorpus {
    /// Create a corpus from an initial record set.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records: RwLock::new(records) }
    }

    /// Replace the whole corpus, as a re-ingestion would.
    pub async fn replace(&self, records: Vec<Record>) {
        *self.records.write().await = records;
    }
}

#[async_trait]
impl CorpusProvider for InMemoryCorpus {
    async fn snapshot(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().await.clone())
    }
}

/// A term-frequency index over record text, for development and tests.
///
/// Scoring is deliberately simple (sum of query-term frequencies over
/// title and content); what matters for the engine contract is that hits
/// come back rank-ordered, deterministic, and 1-based.
#[derive(Debug, Default)]
pub struct InMemoryTermIndex {
    docs: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryTermIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over a record set.
    pub async fn from_records(records: &[Record]) -> Self {
        let index = Self::new();
        for record in records {
            index.index_record(record).await;
        }
        index
    }

    /// Add (or replace) one record's tokens in the index.
    pub async fn index_record(&self, record: &Record) {
        let tokens = tokenize(&format!("{} {}", record.title, record.content));
        self.docs.write().await.insert(record.id.clone(), tokens);
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[async_trait]
impl TermIndex for InMemoryTermIndex {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<TermHit>> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let docs = self.docs.read().await;
        let mut scored: Vec<(&String, usize)> = docs
            .iter()
            .filter_map(|(id, tokens)| {
                let score: usize =
                    terms.iter().map(|term| tokens.iter().filter(|t| *t == term).count()).sum();
                (score > 0).then_some((id, score))
            })
            .collect();

        // Ties break by record id so ranks are stable across runs.
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Ok(scored
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (id, _))| TermHit { record_id: id.clone(), rank: i + 1 })
            .collect())
    }
}

/// A brute-force nearest-neighbor index using cosine distance.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    entries: RwLock<Vec<(String, Vec<f32>)>>,
}

impl InMemoryVectorIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over a record set, skipping records without embeddings.
    pub async fn from_records(records: &[Record]) -> Self {
        let index = Self::new();
        for record in records {
            if !record.embedding.is_empty() {
                index.add(record.id.clone(), record.embedding.clone()).await;
            }
        }
        index
    }

    /// Add one embedding to the index.
    pub async fn add(&self, record_id: String, embedding: Vec<f32>) {
        self.entries.write().await.push((record_id, embedding));
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<VectorHit>> {
        let entries = self.entries.read().await;
        let mut hits: Vec<VectorHit> = entries
            .iter()
            .map(|(id, stored)| VectorHit {
                record_id: id.clone(),
                distance: 1.0 - cosine_similarity(stored, embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, content: &str, embedding: Vec<f32>) -> Record {
        Record {
            id: id.to_string(),
            page_id: id.split('-').next().unwrap_or(id).to_string(),
            title: title.to_string(),
            content: content.to_string(),
            labels: Vec::new(),
            embedding,
        }
    }

    #[tokio::test]
    async fn corpus_snapshot_is_isolated_from_replacement() {
        let corpus = InMemoryCorpus::new(vec![record("a-0", "A", "", vec![])]);
        let snapshot = corpus.snapshot().await.unwrap();

        corpus.replace(vec![]).await;

        assert_eq!(snapshot.len(), 1);
        assert!(corpus.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn term_index_ranks_by_term_frequency() {
        let records = vec![
            record("a-0", "Withdrawal", "withdrawal withdrawal process", vec![]),
            record("b-0", "Overview", "one mention of withdrawal", vec![]),
            record("c-0", "Unrelated", "nothing here", vec![]),
        ];
        let index = InMemoryTermIndex::from_records(&records).await;

        let hits = index.search("withdrawal", 10).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], TermHit { record_id: "a-0".to_string(), rank: 1 });
        assert_eq!(hits[1], TermHit { record_id: "b-0".to_string(), rank: 2 });
    }

    #[tokio::test]
    async fn term_index_empty_query_returns_nothing() {
        let records = vec![record("a-0", "Title", "content", vec![])];
        let index = InMemoryTermIndex::from_records(&records).await;
        assert!(index.search("  ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn vector_index_orders_by_ascending_distance() {
        let records = vec![
            record("a-0", "A", "", vec![1.0, 0.0]),
            record("b-0", "B", "", vec![0.0, 1.0]),
            record("c-0", "C", "", vec![0.9, 0.1]),
        ];
        let index = InMemoryVectorIndex::from_records(&records).await;

        let hits = index.search(&[1.0, 0.0], 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].record_id, "a-0");
        assert!(hits[0].distance < 1e-6);
        assert_eq!(hits[1].record_id, "c-0");
        assert!(hits[1].distance < hits[0].distance + 1.0);
    }

    #[tokio::test]
    async fn vector_index_skips_records_without_embeddings() {
        let records = vec![
            record("a-0", "A", "", vec![1.0, 0.0]),
            record("b-0", "B", "", vec![]),
        ];
        let index = InMemoryVectorIndex::from_records(&records).await;

        let hits = index.search(&[1.0, 0.0], 10).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record_id, "a-0");
    }
}
