//! Vector math helpers shared by the vector stage and its backends.
//!
//! None of these mutate their inputs. Zero-norm vectors are guarded by
//! falling back to a norm of 1.0 rather than dividing by zero.

/// Dot product of two vectors, over the shorter common length.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 norm of a vector, falling back to 1.0 for the zero vector.
pub fn l2_norm(a: &[f32]) -> f32 {
    let norm = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 { 1.0 } else { norm }
}

/// Return an L2-normalized copy of the vector.
///
/// The zero vector is returned unchanged (its fallback norm is 1.0).
pub fn l2_normalize(a: &[f32]) -> Vec<f32> {
    let norm = l2_norm(a);
    a.iter().map(|x| x / norm).collect()
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    dot(a, b) / (l2_norm(a) * l2_norm(b))
}
