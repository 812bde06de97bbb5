//! Generation-based visited set for graph traversal.
//!
//! Replaces `HashSet<u32>` with O(1) array indexing; `clear()` bumps a
//! generation counter instead of zeroing the array, so the set can be
//! reused across the many `search_layer` calls of one insertion or
//! query.

#[derive(Debug)]
pub(crate) struct VisitedSet {
    data: Vec<u16>,
    generation: u16,
}

impl VisitedSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u16; capacity],
            generation: 1,
        }
    }

    /// Reset the set. Full memset only every 65534 calls.
    pub(crate) fn clear(&mut self) {
        if self.generation == u16::MAX {
            self.data.fill(0);
            self.generation = 1;
        } else {
            self.generation += 1;
        }
    }

    /// Mark `id` as visited. Returns `true` if it was not already visited.
    #[inline]
    pub(crate) fn insert(&mut self, id: u32) -> bool {
        let idx = id as usize;
        if self.data[idx] == self.generation {
            false
        } else {
            self.data[idx] = self.generation;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_clear() {
        let mut vs = VisitedSet::new(100);
        assert!(vs.insert(0));
        assert!(!vs.insert(0));
        assert!(vs.insert(50));

        vs.clear();
        assert!(vs.insert(0));
        assert!(vs.insert(50));
    }

    #[test]
    fn test_generation_wraparound() {
        let mut vs = VisitedSet::new(10);
        for _ in 0..65534 {
            vs.clear();
        }
        assert_eq!(vs.generation, u16::MAX);
        vs.insert(5);

        vs.clear();
        assert_eq!(vs.generation, 1);
        assert!(vs.insert(5));
    }
}
