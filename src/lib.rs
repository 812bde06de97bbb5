//! Proxima: approximate nearest-neighbor search over hashed text vectors.
//!
//! The crate splits into three layers:
//!
//! - [`proxima_core`]: the deterministic hashing-trick vectorizer,
//!   cosine distance and scoring, configuration, and the error type.
//! - [`proxima_index`]: the layered proximity graph (build, query,
//!   snapshot codec) and the [`AnnStore`] facade pairing a graph with
//!   its id-to-key order table.
//! - [`Engine`]: a serving slot that owns at most one store and maps
//!   "no index yet" to [`ProximaError::NotBuilt`].
//!
//! ```no_run
//! use proxima::{Corpus, Engine, IndexConfig};
//!
//! # fn main() -> proxima::ProximaResult<()> {
//! let corpus = Corpus::from_json(&std::fs::read("corpus.json")?)?;
//! let mut engine = Engine::new();
//! engine.build(&corpus, IndexConfig::new(corpus.dims)?, 42)?;
//! for m in engine.query("connection retry backoff", 5)? {
//!     println!("{:.3}  {}", m.score, m.key);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use proxima_core::{
    clamp_distance, cosine_distance, similarity_score, vectorize, DistanceSpace, IndexConfig,
    ProximaError, ProximaResult,
};
pub use proxima_index::{AnnStore, Corpus, HnswIndex, Match, OrderTable, SNAPSHOT_VERSION};

use std::path::Path;

/// Serving slot for a single ANN store.
///
/// The engine starts empty; [`Engine::build`] or one of the load
/// methods fills the slot, and every query before that fails with
/// [`ProximaError::NotBuilt`]. Rebuilding or reloading replaces the
/// previous store.
#[derive(Debug, Default)]
pub struct Engine {
    store: Option<AnnStore>,
}

impl Engine {
    /// Create an engine with an empty slot
    pub fn new() -> Self {
        Engine { store: None }
    }

    /// `true` once a store has been built or loaded
    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    /// Build an index from a corpus and install it
    pub fn build(&mut self, corpus: &Corpus, config: IndexConfig, seed: u64) -> ProximaResult<()> {
        self.store = Some(AnnStore::build(corpus, config, seed)?);
        Ok(())
    }

    /// Load an index from its artifact pair and install it
    pub fn load(&mut self, index_bytes: &[u8], order_bytes: &[u8]) -> ProximaResult<()> {
        self.store = Some(AnnStore::load(index_bytes, order_bytes)?);
        Ok(())
    }

    /// Load an index from its artifact pair on disk and install it
    pub fn load_from(&mut self, index_path: &Path, order_path: &Path) -> ProximaResult<()> {
        self.store = Some(AnnStore::load_from(index_path, order_path)?);
        Ok(())
    }

    /// Access the installed store, or `NotBuilt` if the slot is empty
    pub fn store(&self) -> ProximaResult<&AnnStore> {
        self.store.as_ref().ok_or(ProximaError::NotBuilt)
    }

    /// Top-k matches for a text query against the installed store
    pub fn query(&self, text: &str, k: usize) -> ProximaResult<Vec<Match>> {
        self.store()?.query_text(text, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_before_build_is_not_built() {
        let engine = Engine::new();
        assert!(!engine.is_ready());
        assert!(matches!(
            engine.query("anything", 3),
            Err(ProximaError::NotBuilt)
        ));
        assert!(matches!(engine.store(), Err(ProximaError::NotBuilt)));
    }
}
