//! Exact and partial title matching against the corpus snapshot.

use wikiqa_core::{Candidate, MatchSource, Record};

use crate::similarity::title_similarity;

/// Find records whose title is a near-verbatim match for the query.
///
/// Every record's title is scored with [`title_similarity`] against the
/// query; records at or above `threshold` are kept, sorted by similarity
/// descending and tagged `title-exact`.
///
/// A non-empty result authorizes the caller to short-circuit the pipeline:
/// this is the low-latency path for queries that name a known document
/// almost verbatim.
pub fn search_title_exact(query: &str, records: &[Record], threshold: f32) -> Vec<Candidate> {
    let mut matches: Vec<Candidate> = records
        .iter()
        .filter_map(|record| {
            let similarity = title_similarity(&record.title, query);
            if similarity < threshold {
                return None;
            }
            let mut candidate = Candidate::from_record(record, MatchSource::TitleExact);
            candidate.title_similarity = Some(similarity);
            Some(candidate)
        })
        .collect();

    matches.sort_by(|a, b| {
        b.title_similarity
            .partial_cmp(&a.title_similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}

/// Find records whose title contains a sufficient share of the keywords.
///
/// For each record, `match_ratio = |matched keywords| / |keywords|` where a
/// keyword matches via case-insensitive substring containment in the title
/// (not token-set equality). Records with `match_ratio >= min_match_ratio`
/// are kept, sorted by ratio descending and tagged `title-partial`.
///
/// An empty keyword list yields a ratio of 0 for every record — no partial
/// matches, not an error.
pub fn search_title_partial(
    keywords: &[String],
    records: &[Record],
    min_match_ratio: f32,
) -> Vec<Candidate> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut matches: Vec<Candidate> = records
        .iter()
        .filter_map(|record| {
            let title = record.title.to_lowercase();
            let matched: Vec<String> = keywords
                .iter()
                .zip(&lowered)
                .filter(|(_, lower)| title.contains(lower.as_str()))
                .map(|(original, _)| original.clone())
                .collect();

            let ratio = matched.len() as f32 / keywords.len() as f32;
            if ratio < min_match_ratio || matched.is_empty() {
                return None;
            }

            let mut candidate = Candidate::from_record(record, MatchSource::TitlePartial);
            candidate.matched_keywords = matched;
            candidate.match_ratio = Some(ratio);
            Some(candidate)
        })
        .collect();

    matches.sort_by(|a, b| {
        b.match_ratio.partial_cmp(&a.match_ratio).unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(page_id: &str, title: &str) -> Record {
        Record {
            id: format!("{page_id}-0"),
            page_id: page_id.to_string(),
            title: title.to_string(),
            content: String::new(),
            labels: Vec::new(),
            embedding: Vec::new(),
        }
    }

    #[test]
    fn exact_match_keeps_only_records_above_threshold() {
        let records = vec![
            record("704643076", "Member Withdrawal Feature"),
            record("2", "Deployment Runbook"),
        ];

        let results = search_title_exact("Member Withdrawal Feature", &records, 0.85);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page_id, "704643076");
        assert_eq!(results[0].sources, vec![MatchSource::TitleExact]);
        assert!(results[0].title_similarity.unwrap() >= 0.85);
    }

    #[test]
    fn exact_match_sorts_by_similarity_descending() {
        let records = vec![
            record("1", "Member Withdrawal Features"),
            record("2", "Member Withdrawal Feature"),
        ];

        let results = search_title_exact("Member Withdrawal Feature", &records, 0.85);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].page_id, "2");
        assert!(results[0].title_similarity >= results[1].title_similarity);
    }

    #[test]
    fn exact_match_on_empty_corpus_is_empty() {
        assert!(search_title_exact("anything", &[], 0.85).is_empty());
    }

    #[test]
    fn partial_match_computes_keyword_ratio() {
        let records = vec![record("1", "Re-registration After Withdrawal")];
        let keywords =
            vec!["withdrawal".to_string(), "re-registration".to_string(), "process".to_string()];

        let results = search_title_partial(&keywords, &records, 0.33);

        assert_eq!(results.len(), 1);
        let ratio = results[0].match_ratio.unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < 1e-6, "got {ratio}");
        assert_eq!(
            results[0].matched_keywords,
            vec!["withdrawal".to_string(), "re-registration".to_string()]
        );
        assert_eq!(results[0].sources, vec![MatchSource::TitlePartial]);
    }

    #[test]
    fn partial_match_is_case_insensitive_substring_containment() {
        let records = vec![record("1", "Membership Overview")];
        let keywords = vec!["MEMBER".to_string()];

        let results = search_title_partial(&keywords, &records, 0.33);

        // "member" is a substring of "membership" — containment, not token equality.
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn partial_match_drops_records_below_min_ratio() {
        let records = vec![record("1", "Member Withdrawal Feature")];
        let keywords = vec![
            "withdrawal".to_string(),
            "unrelated".to_string(),
            "missing".to_string(),
            "absent".to_string(),
        ];

        // 1/4 matched < 0.33
        assert!(search_title_partial(&keywords, &records, 0.33).is_empty());
    }

    #[test]
    fn empty_keywords_produce_no_partial_matches() {
        let records = vec![record("1", "Member Withdrawal Feature")];
        assert!(search_title_partial(&[], &records, 0.0).is_empty());
    }

    #[test]
    fn partial_match_sorts_by_ratio_descending() {
        let records = vec![
            record("1", "Withdrawal"),
            record("2", "Withdrawal Process"),
        ];
        let keywords = vec!["withdrawal".to_string(), "process".to_string()];

        let results = search_title_partial(&keywords, &records, 0.33);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].page_id, "2");
    }
}
