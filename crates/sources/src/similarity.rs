//! Cosine math over embeddings.

use data_loader::Embedding;

/// Dot product of two equal-length vectors
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dot: dimension mismatch");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// L2-normalise a vector. Returns `None` for the zero vector.
pub fn normalize(vector: &[f32]) -> Option<Embedding> {
    let norm_sq = dot(vector, vector);
    if norm_sq <= 0.0 || !norm_sq.is_finite() {
        return None;
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    Some(vector.iter().map(|v| v * inv_norm).collect())
}

/// Cosine distance `1 - cos(a, b)`, clamped to `[0, 2]`.
///
/// A zero vector has no direction; its distance to anything is 1.0.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let norms = dot(a, a).sqrt() * dot(b, b).sqrt();
    if norms <= 0.0 || !norms.is_finite() {
        return 1.0;
    }
    (1.0 - dot(a, b) / norms).clamp(0.0, 2.0)
}

/// Distance between two already normalised vectors
#[inline]
pub(crate) fn normalized_distance(a: &[f32], b: &[f32]) -> f32 {
    (1.0 - dot(a, b)).clamp(0.0, 2.0)
}
