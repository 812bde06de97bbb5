//! HNSW insertion.
//!
//! Inserts one vector at a time with bidirectional connections and
//! heuristic neighbor pruning (Algorithm 4 from the HNSW paper). Each
//! insertion depends on the graph state left by the previous one, so
//! the build side is inherently sequential.

use crate::graph::HnswIndex;
use crate::visited::VisitedSet;
use proxima_core::ProximaResult;

impl HnswIndex {
    /// Insert a vector, assigning it the next sequential item id.
    ///
    /// Returns the assigned id. Fails with `DimensionMismatch` if the
    /// vector length disagrees with the configured dimension.
    pub fn insert(&mut self, embedding: &[f32]) -> ProximaResult<u32> {
        self.check_dims(embedding)?;
        let id = self.layers.len() as u32;
        let level = self.random_level();

        // First node: becomes the entry point with empty neighbor sets
        let Some(entry_point) = self.entry_point else {
            self.push_node(embedding, level, vec![Vec::new(); level + 1]);
            self.entry_point = Some(id);
            self.max_layer = level;
            return Ok(id);
        };

        let mut visited = VisitedSet::new(self.layers.len());

        // Phase 1: greedy single-best descent from the top layer down to
        // the new node's level + 1. Establishes a good entry into the
        // lower layers without exploring breadth there.
        let mut current_ep = entry_point;
        for layer in (level + 1..=self.max_layer).rev() {
            let nearest = self.search_layer(
                embedding,
                std::slice::from_ref(&current_ep),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, id)) = nearest.first() {
                current_ep = id;
            }
        }

        // Phase 2: beam search each layer from min(level, max_layer)
        // down to 0, selecting neighbors for the new node as we go.
        let top = level.min(self.max_layer);
        let mut node_neighbors: Vec<Vec<u32>> = vec![Vec::new(); level + 1];
        let mut layer_eps: Vec<u32> = vec![current_ep];
        for layer in (0..=top).rev() {
            let candidates = self.search_layer(
                embedding,
                &layer_eps,
                self.config.ef_construction,
                layer,
                &mut visited,
            );

            let m_max = self.link_budget(layer);
            let selected = self.select_neighbors_heuristic(&candidates, m_max);
            node_neighbors[layer] = selected.iter().map(|&(_, id)| id).collect();

            // The full candidate set seeds the next (lower) layer
            layer_eps.clear();
            layer_eps.extend(candidates.iter().map(|&(_, id)| id));
            if layer_eps.is_empty() {
                layer_eps.push(entry_point);
            }
        }

        self.push_node(embedding, level, node_neighbors);

        // Phase 3: mirror the edges and prune any neighbor that now
        // exceeds its layer budget. Pruning re-runs the selection
        // heuristic, which always keeps at least the closest candidate,
        // so no participating node ends up disconnected.
        for layer in 0..=top {
            let m_max = self.link_budget(layer);
            let my_neighbors = self.neighbors[id as usize][layer].clone();
            for &neighbor_id in &my_neighbors {
                let nid = neighbor_id as usize;
                while self.neighbors[nid].len() <= layer {
                    self.neighbors[nid].push(Vec::new());
                }
                self.neighbors[nid][layer].push(id);

                if self.neighbors[nid][layer].len() > m_max {
                    let base = self.embedding(neighbor_id).to_vec();
                    let over: Vec<(f32, u32)> = self.neighbors[nid][layer]
                        .iter()
                        .map(|&cid| (self.distance_to(&base, cid), cid))
                        .collect();
                    let pruned = self.select_neighbors_heuristic(&over, m_max);
                    self.neighbors[nid][layer] = pruned.iter().map(|&(_, id)| id).collect();
                }
            }
        }

        // A node with a strictly higher layer becomes the entry point
        if level > self.max_layer {
            self.max_layer = level;
            self.entry_point = Some(id);
        }

        Ok(id)
    }

    /// Max neighbor list length at a layer: `m_max0` at layer 0, `m` above
    #[inline]
    fn link_budget(&self, layer: usize) -> usize {
        if layer == 0 {
            self.config.m_max0
        } else {
            self.config.m
        }
    }

    fn push_node(&mut self, embedding: &[f32], level: usize, node_neighbors: Vec<Vec<u32>>) {
        self.embeddings.extend_from_slice(embedding);
        self.neighbors.push(node_neighbors);
        self.layers.push(level as u8);
    }

    /// Diversity-aware neighbor selection (Algorithm 4 from the HNSW
    /// paper): a candidate is kept only if it is closer to the base
    /// (the distances carried in `candidates`) than to every
    /// already-selected neighbor. Remaining slots are backfilled with
    /// the closest unused candidates.
    fn select_neighbors_heuristic(&self, candidates: &[(f32, u32)], m: usize) -> Vec<(f32, u32)> {
        let mut sorted = candidates.to_vec();
        sorted
            .sort_unstable_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut selected: Vec<(f32, u32)> = Vec::with_capacity(m);
        for &(dist_to_base, cid) in &sorted {
            if selected.len() >= m {
                break;
            }
            let candidate_vec = self.embedding(cid);
            let is_diverse = selected.iter().all(|&(_, sid)| {
                dist_to_base <= self.config.space.distance(candidate_vec, self.embedding(sid))
            });
            if is_diverse {
                selected.push((dist_to_base, cid));
            }
        }

        if selected.len() < m {
            for &(dist, cid) in &sorted {
                if selected.len() >= m {
                    break;
                }
                if !selected.iter().any(|&(_, sid)| sid == cid) {
                    selected.push((dist, cid));
                }
            }
        }

        selected
    }
}
