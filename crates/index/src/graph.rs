//! HNSW graph structure.
//!
//! [`HnswIndex`] stores the graph arena-style: a contiguous embedding
//! buffer plus per-node adjacency lists indexed by item id. No
//! pointer-linked nodes; the hot search loop only chases small integer
//! ids.

use proxima_core::{IndexConfig, ProximaError, ProximaResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Multi-layer proximity graph over a batch of vectors.
///
/// Built once by sequential insertion, then treated as read-only: every
/// query method takes `&self`, so a loaded index can be shared across
/// threads without locking.
#[derive(Debug)]
pub struct HnswIndex {
    pub(crate) config: IndexConfig,
    /// Contiguous embedding arena: `node_count * dims` floats
    pub(crate) embeddings: Vec<f32>,
    /// Adjacency lists: `[node][layer][neighbor ids]`
    pub(crate) neighbors: Vec<Vec<Vec<u32>>>,
    /// Assigned max layer per node
    pub(crate) layers: Vec<u8>,
    pub(crate) entry_point: Option<u32>,
    pub(crate) max_layer: usize,
    rng: StdRng,
}

impl HnswIndex {
    /// Create an empty index with a validated configuration and a layer
    /// RNG seeded for reproducible builds
    pub fn new(config: IndexConfig, seed: u64) -> ProximaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            embeddings: Vec::new(),
            neighbors: Vec::new(),
            layers: Vec::new(),
            entry_point: None,
            max_layer: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Reassemble an index from persisted parts. Structural validation
    /// happens in the snapshot codec before this is called.
    pub(crate) fn from_parts(
        config: IndexConfig,
        embeddings: Vec<f32>,
        neighbors: Vec<Vec<Vec<u32>>>,
        layers: Vec<u8>,
        entry_point: Option<u32>,
        max_layer: usize,
    ) -> ProximaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            embeddings,
            neighbors,
            layers,
            entry_point,
            max_layer,
            // A loaded index is read-only; the seed is irrelevant
            rng: StdRng::seed_from_u64(0),
        })
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// `true` if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Index configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Vector dimension
    pub fn dims(&self) -> usize {
        self.config.dims
    }

    /// Entry node for every top-layer search, `None` until first insert
    pub fn entry_point(&self) -> Option<u32> {
        self.entry_point
    }

    /// Highest layer currently in use
    pub fn max_layer(&self) -> usize {
        self.max_layer
    }

    /// Embedding slice for a node. O(1) into the contiguous arena.
    #[inline]
    pub fn embedding(&self, id: u32) -> &[f32] {
        let start = id as usize * self.config.dims;
        &self.embeddings[start..start + self.config.dims]
    }

    /// Assigned max layer of a node
    #[inline]
    pub fn layer_of(&self, id: u32) -> usize {
        self.layers[id as usize] as usize
    }

    /// Neighbor ids of a node at a layer (empty if the node does not
    /// participate in that layer)
    #[inline]
    pub fn neighbors_at(&self, id: u32, layer: usize) -> &[u32] {
        self.neighbors[id as usize]
            .get(layer)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distance from an external query vector to a stored node
    #[inline]
    pub(crate) fn distance_to(&self, query: &[f32], id: u32) -> f32 {
        self.config.space.distance(query, self.embedding(id))
    }

    /// Validate that a query vector matches the configured dimension
    pub(crate) fn check_dims(&self, vector: &[f32]) -> ProximaResult<()> {
        if vector.len() != self.config.dims {
            return Err(ProximaError::DimensionMismatch {
                expected: self.config.dims,
                got: vector.len(),
            });
        }
        Ok(())
    }

    /// Draw a layer for a new node from the standard exponentially
    /// decaying HNSW distribution, capped by `max_layers`
    pub(crate) fn random_level(&mut self) -> usize {
        let ml = 1.0 / (self.config.m as f64).ln();
        let r: f64 = self.rng.gen();
        let level = (-r.ln() * ml).floor() as usize;
        level.min(self.config.max_layers - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_is_empty() {
        let index = HnswIndex::new(IndexConfig::new(4).unwrap(), 42).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.entry_point(), None);
        assert_eq!(index.max_layer(), 0);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = IndexConfig {
            dims: 0,
            ..Default::default()
        };
        assert!(HnswIndex::new(config, 0).is_err());
    }

    #[test]
    fn test_random_level_bounded_and_seeded() {
        let config = IndexConfig::new(8).unwrap();
        let mut a = HnswIndex::new(config.clone(), 7).unwrap();
        let mut b = HnswIndex::new(config, 7).unwrap();
        for _ in 0..1000 {
            let la = a.random_level();
            assert!(la < a.config.max_layers);
            assert_eq!(la, b.random_level());
        }
    }

    #[test]
    fn test_random_level_decays() {
        let mut index = HnswIndex::new(IndexConfig::new(8).unwrap(), 3).unwrap();
        let mut zero = 0usize;
        for _ in 0..1000 {
            if index.random_level() == 0 {
                zero += 1;
            }
        }
        // With M=16 roughly 15/16 of draws land on layer 0
        assert!(zero > 800, "expected mostly layer 0, got {zero}");
    }

    #[test]
    fn test_check_dims() {
        let index = HnswIndex::new(IndexConfig::new(4).unwrap(), 0).unwrap();
        assert!(index.check_dims(&[0.0; 4]).is_ok());
        assert!(matches!(
            index.check_dims(&[0.0; 3]),
            Err(proxima_core::ProximaError::DimensionMismatch {
                expected: 4,
                got: 3
            })
        ));
    }
}
