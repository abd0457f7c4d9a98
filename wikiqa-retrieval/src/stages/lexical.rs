//! Lexical search stage: a thin adapter over the term index collaborator.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;
use wikiqa_core::{Candidate, MatchSource, Record, TermIndex};

/// Fetch keyword-ranked candidates from the term index.
///
/// Hits are resolved against the request's corpus snapshot (`lookup`) and
/// tagged `lexical` with their 1-based rank. Hits for record ids absent
/// from the snapshot are dropped.
///
/// Failure isolation: a backend error or a call exceeding `timeout` yields
/// an empty list and a warning — it never aborts the pipeline.
pub async fn search_lexical(
    index: &dyn TermIndex,
    query: &str,
    limit: usize,
    timeout: Duration,
    lookup: &HashMap<&str, &Record>,
) -> Vec<Candidate> {
    let hits = match tokio::time::timeout(timeout, index.search(query, limit)).await {
        Ok(Ok(hits)) => hits,
        Ok(Err(e)) => {
            warn!(error = %e, "term index search failed; lexical stage contributes nothing");
            return Vec::new();
        }
        Err(_) => {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "term index search timed out; lexical stage contributes nothing"
            );
            return Vec::new();
        }
    };

    hits.into_iter()
        .filter_map(|hit| {
            lookup.get(hit.record_id.as_str()).map(|record| {
                let mut candidate = Candidate::from_record(record, MatchSource::Lexical);
                candidate.lexical_rank = Some(hit.rank);
                candidate
            })
        })
        .collect()
}
