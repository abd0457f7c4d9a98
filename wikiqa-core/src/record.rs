//! Data types for corpus records, queries, and retrieval candidates.

use serde::{Deserialize, Serialize};

/// A retrievable unit: one chunk of a source wiki page.
///
/// Records are created during ingestion and are immutable during retrieval.
/// Re-ingestion supersedes a record by producing a new version under the
/// same `id`; it never mutates an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Unique identifier, stable across re-ingestion (`{page_id}-{chunk_index}`).
    pub id: String,
    /// Identifier of the source page; all chunks of a page share it.
    pub page_id: String,
    /// Page title (identical for every chunk of the page).
    pub title: String,
    /// Chunk text, bounded length.
    pub content: String,
    /// Category/tag labels. May be empty; order is irrelevant.
    pub labels: Vec<String>,
    /// Fixed-length embedding vector (dimensionality fixed per deployment).
    pub embedding: Vec<f32>,
}

impl Record {
    /// Build the canonical record id from its page id and chunk index.
    pub fn record_id(page_id: &str, chunk_index: usize) -> String {
        format!("{page_id}-{chunk_index}")
    }
}

/// Identifies which retrieval stage produced a candidate.
///
/// The enum order doubles as the stage priority used for fusion
/// tie-breaking: earlier variants outrank later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSource {
    /// Near-verbatim title match (authorizes the early exit).
    TitleExact,
    /// Keyword-overlap title match.
    TitlePartial,
    /// Embedding nearest-neighbor match.
    Vector,
    /// Term-index (BM25-style) match.
    Lexical,
    /// Label/metadata heuristic match.
    LabelMatch,
}

impl MatchSource {
    /// Stage priority for tie-breaking: 0 is highest (title-exact).
    pub fn priority(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::TitleExact => write!(f, "title-exact"),
            MatchSource::TitlePartial => write!(f, "title-partial"),
            MatchSource::Vector => write!(f, "vector"),
            MatchSource::Lexical => write!(f, "lexical"),
            MatchSource::LabelMatch => write!(f, "label-match"),
        }
    }
}

/// A record annotated with match provenance during retrieval.
///
/// A candidate always carries enough per-stage detail to recompute why it
/// was selected. Candidates for the same page arriving from different
/// stages are merged by the aggregator rather than duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Identifier of the record this candidate was built from.
    pub record_id: String,
    /// Source page identifier.
    pub page_id: String,
    /// Page title (copied from the record).
    pub title: String,
    /// Chunk text (copied from the record).
    pub content: String,
    /// Which stage(s) produced this candidate, in arrival order.
    pub sources: Vec<MatchSource>,
    /// Title similarity in [0,1] from the title-exact stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_similarity: Option<f32>,
    /// Query keywords found in the title by the title-partial stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<String>,
    /// Matched-keyword ratio in [0,1] from the title-partial stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_ratio: Option<f32>,
    /// Additive score from the label-match stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_score: Option<f32>,
    /// 1-based rank from the lexical stage (not a raw score).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexical_rank: Option<usize>,
    /// Raw distance from the vector stage (lower = more similar).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_distance: Option<f32>,
    /// Final fused score. Populated only by the aggregator; 0.0 before fusion.
    pub composite_score: f32,
}

impl Candidate {
    /// Create a candidate from a record with a single originating stage.
    ///
    /// All per-stage score fields start unset; the producing stage fills in
    /// its own signal afterwards.
    pub fn from_record(record: &Record, source: MatchSource) -> Self {
        Self {
            record_id: record.id.clone(),
            page_id: record.page_id.clone(),
            title: record.title.clone(),
            content: record.content.clone(),
            sources: vec![source],
            title_similarity: None,
            matched_keywords: Vec::new(),
            match_ratio: None,
            label_score: None,
            lexical_rank: None,
            vector_distance: None,
            composite_score: 0.0,
        }
    }

    /// The highest-priority stage that produced this candidate (0 = highest).
    pub fn best_priority(&self) -> u8 {
        self.sources.iter().map(|s| s.priority()).min().unwrap_or(u8::MAX)
    }
}

/// Ephemeral retrieval input.
///
/// Keywords and the query embedding are produced upstream by the keyword
/// extraction and embedding collaborators; the engine consumes them as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Query {
    /// Raw query string.
    pub text: String,
    /// Extracted keywords, in extraction order.
    pub keywords: Vec<String>,
    /// Precomputed query embedding. May be empty when no embedding is
    /// available, in which case the vector stage contributes nothing.
    pub embedding: Vec<f32>,
}

impl Query {
    /// Create a query from its parts.
    pub fn new(
        text: impl Into<String>,
        keywords: Vec<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self { text: text.into(), keywords, embedding }
    }

    /// `true` when the query has neither text nor keywords.
    ///
    /// Such a query is invalid input and is rejected before any stage runs.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.keywords.is_empty()
    }
}
