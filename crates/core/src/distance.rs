//! Distance math and similarity score conversion
//!
//! The engine works internally with distances (lower = more similar) and
//! converts to similarity scores only at the serving boundary. Cosine
//! distance on unit vectors lives in `[0, 2]` in exact arithmetic;
//! floating-point noise near the extremes is clamped here rather than
//! surfaced as an error.

/// Dot product of two equal-length vectors
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dimension mismatch in dot product");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 norm (Euclidean length)
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine distance for unit (or near-unit) vectors: `1 - dot(a, b)`
///
/// The stored corpus and every query vector are L2-normalized by the
/// vectorizer, so no renormalization happens here.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - dot(a, b)
}

/// Clamp an engine-level distance into the theoretical cosine range `[0, 2]`
pub fn clamp_distance(d: f32) -> f32 {
    d.clamp(0.0, 2.0)
}

/// Convert a distance into the caller-facing similarity score.
///
/// `score = 1 - clamp(d, 0, 2) / 2`, always in `[0, 1]`; 1.0 means
/// identical direction.
pub fn similarity_score(d: f32) -> f32 {
    1.0 - clamp_distance(d) / 2.0
}
