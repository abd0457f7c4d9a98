//! Candidate aggregation and rank fusion.
//!
//! Merges the per-stage candidate lists into one ranked, de-duplicated
//! list. Every input signal is mapped onto `[0, 1]` before weighting so
//! that no single stage's scale dominates the sum, and the final ordering
//! is a total order: ties on the composite score break by stage priority,
//! then by page id, so a fixed corpus snapshot and query always produce
//! the identical list.

use std::collections::HashMap;

use wikiqa_core::Candidate;

use crate::config::{DedupKey, FusionWeights};

/// Fuse stage outputs into a single ranked top-`k` list.
///
/// `candidates` is the concatenation of all stage outputs in stage
/// priority order (title-exact first); when the same page (or chunk,
/// per `dedup_key`) arrives from several stages, the first-seen title and
/// content win and the per-stage scores are unioned.
///
/// The returned list contains no two candidates with the same dedup key,
/// is sorted by `composite_score` descending, and each candidate's score
/// is reproducible from its retained per-stage fields via
/// [`composite_score`].
pub fn fuse(
    candidates: Vec<Candidate>,
    weights: &FusionWeights,
    dedup_key: DedupKey,
    top_k: usize,
) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let key = match dedup_key {
            DedupKey::Page => candidate.page_id.clone(),
            DedupKey::Chunk => candidate.record_id.clone(),
        };
        match index_by_key.get(&key) {
            Some(&i) => merge_into(&mut merged[i], candidate),
            None => {
                index_by_key.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    let max_distance = max_observed_distance(&merged);
    for candidate in &mut merged {
        candidate.composite_score = composite_score(candidate, weights, max_distance);
    }

    merged.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.best_priority().cmp(&b.best_priority()))
            .then_with(|| a.page_id.cmp(&b.page_id))
    });
    merged.truncate(top_k);
    merged
}

/// The largest vector distance retained across a candidate list.
///
/// Together with the per-stage fields this makes every composite score
/// recomputable from the merged candidate set with no hidden state.
pub fn max_observed_distance(candidates: &[Candidate]) -> f32 {
    candidates.iter().filter_map(|c| c.vector_distance).fold(0.0f32, f32::max)
}

/// Weighted sum over the candidate's available per-stage signals.
///
/// Missing signals contribute 0. Lexical rank decays as `1/rank`; vector
/// distance maps to `1 - distance/max_observed_distance` (and to `1.0`
/// when every observed distance is zero).
pub fn composite_score(
    candidate: &Candidate,
    weights: &FusionWeights,
    max_observed_distance: f32,
) -> f32 {
    let mut score = 0.0f32;
    if let Some(similarity) = candidate.title_similarity {
        score += weights.title_exact * similarity;
    }
    if let Some(ratio) = candidate.match_ratio {
        score += weights.title_partial * ratio;
    }
    if let Some(distance) = candidate.vector_distance {
        score += weights.vector * normalize_distance(distance, max_observed_distance);
    }
    if let Some(rank) = candidate.lexical_rank {
        score += weights.lexical * normalize_rank(rank);
    }
    if let Some(label_score) = candidate.label_score {
        score += weights.label * label_score;
    }
    score
}

fn normalize_distance(distance: f32, max_observed: f32) -> f32 {
    if max_observed <= 0.0 {
        // Every observed distance was zero: identical vectors.
        return 1.0;
    }
    (1.0 - distance / max_observed).clamp(0.0, 1.0)
}

fn normalize_rank(rank: usize) -> f32 {
    // Ranks are 1-based per the TermIndex contract.
    1.0 / rank.max(1) as f32
}

/// Union the incoming candidate's provenance into the existing one.
///
/// First-seen title, content, and record id win; each per-stage score is
/// only ever improved (higher similarity/ratio/score, lower rank/distance).
fn merge_into(existing: &mut Candidate, incoming: Candidate) {
    for source in incoming.sources {
        if !existing.sources.contains(&source) {
            existing.sources.push(source);
        }
    }
    for keyword in incoming.matched_keywords {
        if !existing.matched_keywords.contains(&keyword) {
            existing.matched_keywords.push(keyword);
        }
    }
    existing.title_similarity = max_option(existing.title_similarity, incoming.title_similarity);
    existing.match_ratio = max_option(existing.match_ratio, incoming.match_ratio);
    existing.label_score = max_option(existing.label_score, incoming.label_score);
    existing.vector_distance = min_option(existing.vector_distance, incoming.vector_distance);
    existing.lexical_rank = match (existing.lexical_rank, incoming.lexical_rank) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
}

fn max_option(a: Option<f32>, b: Option<f32>) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn min_option(a: Option<f32>, b: Option<f32>) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
