//! String similarity for title matching.
//!
//! Titles are normalized (lowercased, punctuation/whitespace/brackets
//! stripped) before comparison, so `"Member Withdrawal Feature"` and
//! `"member withdrawal feature (v2)"` compare on their shared core.

/// Edit-distance similarity between two titles, in `[0, 1]`.
///
/// Both inputs are normalized, then scored as
/// `1 - levenshtein(a, b) / max(len(a), len(b))`.
///
/// Edge cases: both inputs empty after normalization → `1.0`; exactly one
/// empty → `0.0`. Deterministic and side-effect free; `O(len(a)·len(b))`.
pub fn title_similarity(a: &str, b: &str) -> f32 {
    let norm_a = normalize_title(a);
    let norm_b = normalize_title(b);

    if norm_a.is_empty() && norm_b.is_empty() {
        return 1.0;
    }
    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }

    let max_len = norm_a.len().max(norm_b.len());
    let dist = levenshtein(&norm_a, &norm_b);
    1.0 - dist as f32 / max_len as f32
}

/// Normalize a title for comparison: lowercase, keep alphanumerics only.
///
/// Dropping everything else covers punctuation, whitespace, and bracket
/// characters in one pass.
fn normalize_title(title: &str) -> Vec<char> {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Levenshtein distance over char slices (classic DP).
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let (m, n) = (a.len(), b.len());
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate().take(m + 1) {
        row[0] = i;
    }
    for (j, val) in dp[0].iter_mut().enumerate().take(n + 1) {
        *val = j;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[m][n]
}
