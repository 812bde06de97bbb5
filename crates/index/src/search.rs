//! Layered graph search: single-layer beam search and multi-layer k-NN.
//!
//! Query-side traversal mirrors the build-side descent but performs no
//! mutation; everything here takes `&self` and is safe for concurrent
//! callers. Each search is a single bounded computation driven by an
//! explicit visited set and a pair of heaps.

use crate::graph::HnswIndex;
use crate::visited::VisitedSet;
use ordered_float::OrderedFloat;
use proxima_core::{clamp_distance, ProximaResult};
use std::collections::BinaryHeap;

/// Frontier entry: min-heap behavior via negated distance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    neg_distance: OrderedFloat<f32>,
    id: u32,
}

/// Result-set entry: max-heap by (distance, id) so the worst entry is
/// popped first and, among equals, the larger id goes before the
/// smaller one. That keeps the retained set deterministic under ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ResultEntry {
    distance: OrderedFloat<f32>,
    id: u32,
}

impl HnswIndex {
    /// Best-first beam search over a single layer.
    ///
    /// Returns up to `ef` nearest nodes as `(distance, id)`, ascending.
    pub(crate) fn search_layer(
        &self,
        query: &[f32],
        entry_points: &[u32],
        ef: usize,
        layer: usize,
        visited: &mut VisitedSet,
    ) -> Vec<(f32, u32)> {
        visited.clear();
        let mut candidates: BinaryHeap<Candidate> = BinaryHeap::with_capacity(ef * 2);
        let mut results: BinaryHeap<ResultEntry> = BinaryHeap::with_capacity(ef + 1);
        let mut worst_dist = f32::MAX;

        for &ep in entry_points {
            if visited.insert(ep) {
                let dist = self.distance_to(query, ep);
                candidates.push(Candidate {
                    neg_distance: OrderedFloat(-dist),
                    id: ep,
                });
                results.push(ResultEntry {
                    distance: OrderedFloat(dist),
                    id: ep,
                });
                if results.len() >= ef {
                    worst_dist = results.peek().map_or(f32::MAX, |r| r.distance.0);
                }
            }
        }

        while let Some(candidate) = candidates.pop() {
            let c_dist = -candidate.neg_distance.0;

            // The closest unexpanded candidate is already worse than the
            // worst kept result: the beam is done.
            if results.len() >= ef && c_dist > worst_dist {
                break;
            }

            for &neighbor_id in self.neighbors_at(candidate.id, layer) {
                if !visited.insert(neighbor_id) {
                    continue;
                }
                let dist = self.distance_to(query, neighbor_id);
                if results.len() < ef || dist < worst_dist {
                    candidates.push(Candidate {
                        neg_distance: OrderedFloat(-dist),
                        id: neighbor_id,
                    });
                    results.push(ResultEntry {
                        distance: OrderedFloat(dist),
                        id: neighbor_id,
                    });
                    if results.len() > ef {
                        results.pop();
                    }
                    worst_dist = results.peek().map_or(f32::MAX, |r| r.distance.0);
                }
            }
        }

        results
            .into_sorted_vec()
            .into_iter()
            .map(|r| (r.distance.0, r.id))
            .collect()
    }

    /// Approximate k-nearest-neighbor query.
    ///
    /// Greedy single-best descent from the entry point down to layer 1,
    /// then a beam of width `max(ef_search, k)` at layer 0. Returns up
    /// to `k` items as `(id, distance)` ascending by distance, ties
    /// broken by smaller id; distances are clamped into `[0, 2]`. An
    /// empty index yields an empty result; `k` larger than the item
    /// count yields every item.
    pub fn search(&self, query: &[f32], k: usize) -> ProximaResult<Vec<(u32, f32)>> {
        self.check_dims(query)?;
        let Some(entry_point) = self.entry_point else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut visited = VisitedSet::new(self.len());
        let mut current_ep = entry_point;
        for layer in (1..=self.max_layer).rev() {
            let nearest = self.search_layer(
                query,
                std::slice::from_ref(&current_ep),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, id)) = nearest.first() {
                current_ep = id;
            }
        }

        let ef = self.config.ef_search.max(k);
        let mut results = self.search_layer(
            query,
            std::slice::from_ref(&current_ep),
            ef,
            0,
            &mut visited,
        );
        results.truncate(k);

        Ok(results
            .into_iter()
            .map(|(dist, id)| (id, clamp_distance(dist)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxima_core::IndexConfig;

    fn normalized(mut v: Vec<f32>) -> Vec<f32> {
        let n = proxima_core::l2_norm(&v);
        if n > 0.0 {
            v.iter_mut().for_each(|x| *x /= n);
        }
        v
    }

    fn build_index(vectors: &[Vec<f32>], dims: usize, seed: u64) -> HnswIndex {
        let config = IndexConfig::new(dims).unwrap().with_m(4);
        let mut index = HnswIndex::new(config, seed).unwrap();
        for v in vectors {
            index.insert(v).unwrap();
        }
        index
    }

    fn spread_vectors(n: usize, dims: usize) -> Vec<Vec<f32>> {
        (0..n)
            .map(|i| {
                let mut v = vec![0.0f32; dims];
                v[i % dims] = 1.0;
                v[(i * 3 + 1) % dims] = 0.5 + (i as f32 / n as f32);
                normalized(v)
            })
            .collect()
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = HnswIndex::new(IndexConfig::new(4).unwrap(), 0).unwrap();
        assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_k_zero_returns_nothing() {
        let index = build_index(&spread_vectors(10, 8), 8, 1);
        assert!(index.search(index.embedding(0), 0).unwrap().is_empty());
    }

    #[test]
    fn test_self_query_returns_self_top1() {
        let vectors = spread_vectors(100, 8);
        let index = build_index(&vectors, 8, 42);
        for id in 0..vectors.len() as u32 {
            let results = index.search(index.embedding(id), 1).unwrap();
            let &(top_id, top_dist) = results.first().unwrap();
            assert!(top_dist < 1e-5, "self-distance {top_dist} for {id}");
            // Duplicate vectors tie at distance 0; the winner must then
            // be the smallest id among the duplicates
            assert!(
                index.embedding(top_id) == index.embedding(id),
                "top-1 for {id} was {top_id} with a different vector"
            );
        }
    }

    #[test]
    fn test_results_sorted_ascending() {
        let index = build_index(&spread_vectors(80, 8), 8, 9);
        let query = normalized(vec![1.0, 0.3, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0]);
        let results = index.search(&query, 10).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
            if pair[0].1 == pair[1].1 {
                assert!(pair[0].0 < pair[1].0, "id tie-break violated");
            }
        }
    }

    #[test]
    fn test_k_exceeds_item_count() {
        let index = build_index(&spread_vectors(7, 8), 8, 2);
        let results = index.search(index.embedding(0), 50).unwrap();
        assert_eq!(results.len(), 7);
        let mut ids: Vec<u32> = results.iter().map(|&(id, _)| id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 7, "duplicate ids in results");
    }

    #[test]
    fn test_distances_clamped() {
        let index = build_index(&spread_vectors(30, 8), 8, 3);
        let query = normalized(vec![-1.0, -1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 0.0]);
        for (_, dist) in index.search(&query, 30).unwrap() {
            assert!((0.0..=2.0).contains(&dist));
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = build_index(&spread_vectors(10, 8), 8, 4);
        assert!(matches!(
            index.search(&[1.0, 0.0], 3),
            Err(proxima_core::ProximaError::DimensionMismatch { expected: 8, got: 2 })
        ));
    }

    #[test]
    fn test_query_determinism() {
        let index = build_index(&spread_vectors(60, 8), 8, 5);
        let query = normalized(vec![0.1, 0.9, 0.0, 0.4, 0.0, 0.0, 0.2, 0.0]);
        let a = index.search(&query, 10).unwrap();
        let b = index.search(&query, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_recall_against_brute_force() {
        let vectors = spread_vectors(200, 16);
        let config = IndexConfig::new(16).unwrap().with_m(8);
        let mut index = HnswIndex::new(config, 77).unwrap();
        for v in &vectors {
            index.insert(v).unwrap();
        }

        let query = normalized(vec![
            0.6, 0.0, 0.3, 0.0, 0.0, 0.1, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0,
        ]);
        let approx = index.search(&query, 10).unwrap();

        let mut exact: Vec<(u32, f32)> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i as u32, proxima_core::cosine_distance(&query, v)))
            .collect();
        exact.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));

        // ef_search=50 on 200 items should recover most of the true top 10
        let exact_top: Vec<u32> = exact.iter().take(10).map(|&(id, _)| id).collect();
        let hits = approx
            .iter()
            .filter(|(id, _)| exact_top.contains(id))
            .count();
        assert!(hits >= 8, "recall too low: {hits}/10");
    }
}
