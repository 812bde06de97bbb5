//! Core types for the proxima ANN engine
//!
//! Everything the graph index and the persistence codec share lives
//! here.
//!
//! - **IndexConfig / DistanceSpace**: tuning parameters and the distance
//!   space identifier persisted with every index
//! - **distance**: cosine distance, clamping, and score conversion
//! - **vectorizer**: the deterministic hashing-trick text vectorizer
//! - **ProximaError**: error taxonomy shared by all proxima crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod distance;
pub mod error;
pub mod vectorizer;

pub use config::{DistanceSpace, IndexConfig};
pub use distance::{clamp_distance, cosine_distance, dot, l2_norm, similarity_score};
pub use error::{ProximaError, ProximaResult};
pub use vectorizer::{hash_bucket, normalize_token, vectorize};
