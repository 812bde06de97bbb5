//! Build-time corpus input.
//!
//! The corpus is a `{ "dims": N, "vectors": { key: [f32; N] } }`
//! document produced by whichever process vectorized the source texts.
//! Map order is preserved on parse so item ids follow corpus order
//! deterministically.

use indexmap::IndexMap;
use proxima_core::{ProximaError, ProximaResult};
use serde::{Deserialize, Serialize};

/// A corpus of pre-vectorized items keyed by external key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// Declared vector dimension
    pub dims: usize,
    /// Key → vector, in file order
    pub vectors: IndexMap<String, Vec<f32>>,
}

impl Corpus {
    /// Parse a corpus from JSON bytes
    pub fn from_json(bytes: &[u8]) -> ProximaResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ProximaError::InvalidInput {
            message: format!("bad corpus: {e}"),
        })
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// `true` if the corpus holds no vectors
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Validate dims and per-vector lengths before a build
    pub fn validate(&self) -> ProximaResult<()> {
        if self.dims == 0 {
            return Err(ProximaError::invalid_input("corpus dims must be > 0"));
        }
        if self.vectors.is_empty() {
            return Err(ProximaError::invalid_input("corpus has no vectors"));
        }
        for (key, vector) in &self.vectors {
            if vector.len() != self.dims {
                return Err(ProximaError::invalid_input(format!(
                    "vector '{key}' has length {}, corpus declares dims {}",
                    vector.len(),
                    self.dims
                )));
            }
        }
        Ok(())
    }
}
