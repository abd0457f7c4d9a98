//! Vector search stage: a thin adapter over the nearest-neighbor index.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;
use wikiqa_core::{Candidate, MatchSource, Record, VectorIndex};

/// Fetch embedding-similarity-ranked candidates from the vector index.
///
/// Neighbors are resolved against the request's corpus snapshot and tagged
/// `vector`, carrying the backend's raw distance (lower = more similar).
/// The adapter does not invert or rescale distances — the aggregator owns
/// scale normalization.
///
/// Same failure isolation as the lexical stage: error or timeout yields an
/// empty list and a warning.
pub async fn search_vector(
    index: &dyn VectorIndex,
    embedding: &[f32],
    limit: usize,
    timeout: Duration,
    lookup: &HashMap<&str, &Record>,
) -> Vec<Candidate> {
    let hits = match tokio::time::timeout(timeout, index.search(embedding, limit)).await {
        Ok(Ok(hits)) => hits,
        Ok(Err(e)) => {
            warn!(error = %e, "vector index search failed; vector stage contributes nothing");
            return Vec::new();
        }
        Err(_) => {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "vector index search timed out; vector stage contributes nothing"
            );
            return Vec::new();
        }
    };

    hits.into_iter()
        .filter_map(|hit| {
            lookup.get(hit.record_id.as_str()).map(|record| {
                let mut candidate = Candidate::from_record(record, MatchSource::Vector);
                candidate.vector_distance = Some(hit.distance);
                candidate
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use wikiqa_core::{Result, VectorHit};

    struct FixedVectorIndex(Vec<VectorHit>);

    #[async_trait]
    impl VectorIndex for FixedVectorIndex {
        async fn search(&self, _embedding: &[f32], _limit: usize) -> Result<Vec<VectorHit>> {
            Ok(self.0.clone())
        }
    }

    struct HangingVectorIndex;

    #[async_trait]
    impl VectorIndex for HangingVectorIndex {
        async fn search(&self, _embedding: &[f32], _limit: usize) -> Result<Vec<VectorHit>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            page_id: id.split('-').next().unwrap_or(id).to_string(),
            title: format!("Title {id}"),
            content: String::new(),
            labels: Vec::new(),
            embedding: vec![0.1, 0.2],
        }
    }

    #[tokio::test]
    async fn neighbors_carry_raw_distances() {
        let records = vec![record("a-0"), record("b-0")];
        let lookup: HashMap<&str, &Record> =
            records.iter().map(|r| (r.id.as_str(), r)).collect();
        let index = FixedVectorIndex(vec![
            VectorHit { record_id: "a-0".to_string(), distance: 0.12 },
            VectorHit { record_id: "b-0".to_string(), distance: 0.48 },
        ]);

        let results =
            search_vector(&index, &[0.1, 0.2], 50, Duration::from_secs(1), &lookup).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].vector_distance, Some(0.12));
        assert_eq!(results[0].sources, vec![MatchSource::Vector]);
        assert_eq!(results[1].vector_distance, Some(0.48));
    }

    #[tokio::test(start_paused = true)]
    async fn backend_timeout_degrades_to_empty() {
        let lookup = HashMap::new();
        let results = search_vector(
            &HangingVectorIndex,
            &[0.1, 0.2],
            50,
            Duration::from_secs(2),
            &lookup,
        )
        .await;
        assert!(results.is_empty());
    }
}
