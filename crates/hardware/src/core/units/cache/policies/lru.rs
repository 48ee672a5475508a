//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each way carries a recency rank: 0 is the most recently used way and
//! `ways - 1` the least. Within a set the ranks always form a permutation of
//! `0..ways`. On access, every way ranked more recently than the accessed way
//! ages by one and the accessed way becomes rank 0; the victim is the way whose
//! rank is `ways - 1`.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(W)
//! - **Space Complexity:** O(S × W) where S is the number of sets

use super::ReplacementPolicy;

/// LRU Policy state.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    ways: usize,
    /// Flattened `[set][way]` rank table.
    ranks: Vec<usize>,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// Way `w` of every set starts at rank `w`, so the ranks are a permutation from
    /// the first cycle and the fill order of an empty set does not disturb it.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let ranks = (0..sets).flat_map(|_| 0..ways).collect();
        Self { ways, ranks }
    }

    fn row(&self, set: usize) -> &[usize] {
        let base = set * self.ways;
        self.ranks.get(base..base + self.ways).unwrap_or(&[])
    }
}

impl ReplacementPolicy for LruPolicy {
    fn update(&mut self, set: usize, way: usize) {
        let base = set * self.ways;
        let Some(row) = self.ranks.get_mut(base..base + self.ways) else {
            return;
        };
        let Some(&accessed) = row.get(way) else {
            return;
        };
        for rank in row.iter_mut() {
            if *rank < accessed {
                *rank += 1;
            }
        }
        if let Some(slot) = row.get_mut(way) {
            *slot = 0;
        }
    }

    fn get_victim(&self, set: usize) -> usize {
        let oldest = self.ways - 1;
        self.row(set)
            .iter()
            .position(|&rank| rank == oldest)
            .unwrap_or_else(|| unreachable!("set {set} has no way at LRU rank {oldest}"))
    }

    fn rank(&self, set: usize, way: usize) -> Option<usize> {
        self.row(set).get(way).copied()
    }
}
