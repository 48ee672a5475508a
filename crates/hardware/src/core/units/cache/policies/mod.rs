//! Replacement state for set-associative levels.
//!
//! The cache fills invalid ways first and asks the policy for a victim only once a
//! set is full. Every level in the hierarchy uses `LruPolicy`.

/// Least Recently Used replacement policy.
pub mod lru;

pub use lru::LruPolicy;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim lines.
pub trait ReplacementPolicy: Send + Sync {
    /// Updates the policy state when a way is accessed (hit or fill).
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that was accessed.
    fn update(&mut self, set: usize, way: usize);

    /// Selects a victim way to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&self, set: usize) -> usize;

    /// Recency rank of a way: 0 is most recently used, `ways - 1` least.
    ///
    /// `None` if `set` or `way` is outside the geometry.
    fn rank(&self, set: usize, way: usize) -> Option<usize>;
}
