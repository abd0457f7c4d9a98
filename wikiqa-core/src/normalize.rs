//! Normalization boundary for collaborator rows.
//!
//! Corpus rows arrive from collaborators with inconsistent field naming
//! across schema versions (`pageId` vs `page_id`, `tags` vs `labels`, …).
//! Everything inside the engine operates on the canonical [`Record`] type,
//! so rows are normalized here, immediately after being read, and nowhere
//! else.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{RetrievalError, Result};
use crate::record::Record;

/// A loosely-shaped corpus row as read from a collaborator.
///
/// Field aliases cover the naming variants observed across schema versions.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "pageId")]
    page_id: String,
    #[serde(default, alias = "chunkIndex")]
    chunk_index: Option<usize>,
    title: String,
    #[serde(default, alias = "body", alias = "text")]
    content: String,
    #[serde(default, alias = "tags", alias = "categories")]
    labels: Vec<String>,
    #[serde(default, alias = "vector")]
    embedding: Vec<f32>,
}

/// Normalize a single collaborator row into a canonical [`Record`].
///
/// The record id is taken from the row when present, otherwise synthesized
/// as `{page_id}-{chunk_index}`. Labels are deduplicated preserving first
/// occurrence. When `expected_dimension` is non-zero, a non-empty embedding
/// must match it.
///
/// # Errors
///
/// Returns [`RetrievalError::Normalization`] when required fields are
/// missing, when neither an id nor a chunk index is present, or on an
/// embedding dimension mismatch.
pub fn normalize_record(row: Value, expected_dimension: usize) -> Result<Record> {
    let raw: RawRecord = serde_json::from_value(row)
        .map_err(|e| RetrievalError::Normalization(format!("malformed corpus row: {e}")))?;

    let id = match (raw.id, raw.chunk_index) {
        (Some(id), _) if !id.is_empty() => id,
        (_, Some(chunk_index)) => Record::record_id(&raw.page_id, chunk_index),
        _ => {
            return Err(RetrievalError::Normalization(format!(
                "row for page '{}' has neither an id nor a chunk index",
                raw.page_id
            )));
        }
    };

    if raw.page_id.is_empty() {
        return Err(RetrievalError::Normalization(format!(
            "row '{id}' has an empty page id"
        )));
    }

    if expected_dimension > 0
        && !raw.embedding.is_empty()
        && raw.embedding.len() != expected_dimension
    {
        return Err(RetrievalError::Normalization(format!(
            "row '{id}' embedding has dimension {}, expected {expected_dimension}",
            raw.embedding.len()
        )));
    }

    let mut labels: Vec<String> = Vec::with_capacity(raw.labels.len());
    for label in raw.labels {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    Ok(Record {
        id,
        page_id: raw.page_id,
        title: raw.title,
        content: raw.content,
        labels,
        embedding: raw.embedding,
    })
}

/// Normalize a batch of collaborator rows, failing on the first bad row.
pub fn normalize_records(rows: Vec<Value>, expected_dimension: usize) -> Result<Vec<Record>> {
    rows.into_iter().map(|row| normalize_record(row, expected_dimension)).collect()
}
