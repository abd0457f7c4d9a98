//! Label/metadata match stage.
//!
//! A deliberately coarse heuristic over titles and labels rather than the
//! embedding space, so metadata-only matches surface even when content
//! wording differs from the query.

use wikiqa_core::{Candidate, MatchSource, Record};

/// Score records by keyword overlap with their title and labels.
///
/// The score accumulates additively: +0.5 if any keyword is a substring of
/// the title (case-insensitive), +0.5 if any keyword is a substring of any
/// label. Records below `min_score` are dropped; the rest are sorted by
/// score descending and tagged `label-match`.
pub fn search_by_label(
    keywords: &[String],
    records: &[Record],
    min_score: f32,
) -> Vec<Candidate> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut matches: Vec<Candidate> = records
        .iter()
        .filter_map(|record| {
            let title = record.title.to_lowercase();
            let mut score = 0.0f32;

            if lowered.iter().any(|k| title.contains(k.as_str())) {
                score += 0.5;
            }
            if record
                .labels
                .iter()
                .any(|label| {
                    let label = label.to_lowercase();
                    lowered.iter().any(|k| label.contains(k.as_str()))
                })
            {
                score += 0.5;
            }

            if score < min_score || score == 0.0 {
                return None;
            }

            let mut candidate = Candidate::from_record(record, MatchSource::LabelMatch);
            candidate.label_score = Some(score);
            Some(candidate)
        })
        .collect();

    matches.sort_by(|a, b| {
        b.label_score.partial_cmp(&a.label_score).unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}
