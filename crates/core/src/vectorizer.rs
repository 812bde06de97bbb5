//! Hashing-trick text vectorizer
//!
//! Maps raw text to a fixed-dimension, L2-normalized term-frequency
//! vector. The bucket for a token depends only on SHA-256 and `dims`,
//! which makes vectors bit-compatible with the other implementations
//! that share this corpus: any conforming vectorizer assigns the same
//! token to the same bucket.

use crate::distance::l2_norm;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Normalize a raw token: lowercase, then keep only alphanumerics.
///
/// Returns an empty string for tokens that are pure punctuation; callers
/// discard those.
pub fn normalize_token(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Bucket index for a normalized token.
///
/// SHA-256 over the token's UTF-8 bytes, first 4 bytes interpreted as a
/// big-endian u32, reduced modulo `dims`. This exact rule is the
/// interop contract; do not substitute a faster hash.
///
/// # Panics
///
/// Panics if `dims` is zero. `dims` always comes from a validated
/// [`IndexConfig`](crate::IndexConfig).
pub fn hash_bucket(token: &str, dims: usize) -> usize {
    let digest = Sha256::digest(token.as_bytes());
    let val = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    val as usize % dims
}

/// Vectorize text into a `dims`-length, L2-normalized frequency vector.
///
/// Tokens are split on whitespace and normalized via
/// [`normalize_token`]; empty results are discarded. Bucket collisions
/// sum, which is the point of the hashing trick. Text containing no
/// usable tokens yields the zero vector unmodified (its direction is
/// undefined, and that is permitted).
///
/// # Panics
///
/// Panics if `dims` is zero (see [`hash_bucket`]).
pub fn vectorize(text: &str, dims: usize) -> Vec<f32> {
    let mut freq: HashMap<String, u32> = HashMap::new();
    for raw in text.split_whitespace() {
        let token = normalize_token(raw);
        if !token.is_empty() {
            *freq.entry(token).or_insert(0) += 1;
        }
    }

    let mut vec = vec![0.0f32; dims];
    for (token, count) in &freq {
        vec[hash_bucket(token, dims)] += *count as f32;
    }

    let norm = l2_norm(&vec);
    if norm > 0.0 {
        for v in &mut vec {
            *v /= norm;
        }
    }
    vec
}
