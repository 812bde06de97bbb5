//! ANN store facade.
//!
//! Ties the vectorizer, the graph index, and the order table together:
//! build from a corpus, persist/load the two-artifact pair, and answer
//! text queries with keyed, scored matches.

use crate::corpus::Corpus;
use crate::graph::HnswIndex;
use crate::order::OrderTable;
use proxima_core::{similarity_score, vectorize, IndexConfig, ProximaError, ProximaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// One search hit: external key plus similarity score in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// External key of the matched item
    pub key: String,
    /// Similarity score; 1.0 means identical direction
    pub score: f32,
}

/// Immutable ANN store: a built graph plus its id→key order table.
///
/// Constructed by [`AnnStore::build`] or [`AnnStore::load`]; after that
/// every method takes `&self`, so one store can serve concurrent
/// queries without locking.
#[derive(Debug)]
pub struct AnnStore {
    index: HnswIndex,
    order: OrderTable,
}

impl AnnStore {
    /// Build a store from a corpus, inserting vectors in corpus order.
    ///
    /// `seed` drives the layer RNG; identical (corpus, config, seed)
    /// triples produce byte-identical snapshots.
    pub fn build(corpus: &Corpus, config: IndexConfig, seed: u64) -> ProximaResult<Self> {
        corpus.validate()?;
        if config.dims != corpus.dims {
            return Err(ProximaError::DimensionMismatch {
                expected: config.dims,
                got: corpus.dims,
            });
        }

        let start = Instant::now();
        let mut index = HnswIndex::new(config, seed)?;
        let mut order = OrderTable::with_capacity(corpus.len());
        for (key, vector) in &corpus.vectors {
            index.insert(vector)?;
            order.push(key.clone());
        }
        info!(
            items = order.len(),
            max_layer = index.max_layer(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built ANN index"
        );

        Ok(AnnStore { index, order })
    }

    /// Load a store from its artifact pair. The two blobs belong
    /// together; an order table whose length disagrees with the
    /// snapshot's item count is rejected.
    pub fn load(index_bytes: &[u8], order_bytes: &[u8]) -> ProximaResult<Self> {
        let index = HnswIndex::load(index_bytes)?;
        let order = OrderTable::from_json(order_bytes)?;
        if order.len() != index.len() {
            return Err(ProximaError::corrupt(format!(
                "order table has {} keys but index has {} items",
                order.len(),
                index.len()
            )));
        }
        info!(items = index.len(), "loaded ANN index");
        Ok(AnnStore { index, order })
    }

    /// Serialize the graph snapshot
    pub fn save_index(&self) -> ProximaResult<Vec<u8>> {
        self.index.save()
    }

    /// Serialize the order table as a JSON array
    pub fn save_order(&self) -> ProximaResult<Vec<u8>> {
        self.order.to_json()
    }

    /// Write both artifacts to disk
    pub fn save_to(&self, index_path: &Path, order_path: &Path) -> ProximaResult<()> {
        std::fs::write(index_path, self.save_index()?)?;
        std::fs::write(order_path, self.save_order()?)?;
        Ok(())
    }

    /// Read both artifacts from disk
    pub fn load_from(index_path: &Path, order_path: &Path) -> ProximaResult<Self> {
        let index_bytes = std::fs::read(index_path)?;
        let order_bytes = std::fs::read(order_path)?;
        Self::load(&index_bytes, &order_bytes)
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` if the store indexes nothing
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Index configuration
    pub fn config(&self) -> &IndexConfig {
        self.index.config()
    }

    /// Key of an item id
    pub fn key(&self, id: u32) -> Option<&str> {
        self.order.key(id)
    }

    /// k-NN over a raw query vector: `(item id, distance)` ascending
    pub fn query_vector(&self, query: &[f32], k: usize) -> ProximaResult<Vec<(u32, f32)>> {
        self.index.search(query, k)
    }

    /// Top-k matches for a text query.
    ///
    /// Empty or whitespace-only text yields an empty list, not an
    /// error. Scores are `1 - clamp(d, 0, 2) / 2`, always in `[0, 1]`.
    pub fn query_text(&self, text: &str, k: usize) -> ProximaResult<Vec<Match>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query = vectorize(text, self.index.dims());
        let hits = self.index.search(&query, k)?;
        hits.into_iter()
            .map(|(id, dist)| {
                let key = self.order.key(id).ok_or_else(|| {
                    ProximaError::corrupt(format!("item id {id} missing from order table"))
                })?;
                Ok(Match {
                    key: key.to_string(),
                    score: similarity_score(dist),
                })
            })
            .collect()
    }
}
