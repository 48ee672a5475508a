//! System-on-Chip (SoC) Components.
//!
//! This module holds what sits behind the cache hierarchy: the flat, word-addressed
//! main memory the L2 fills from and writes back to, and the trait that lets a
//! harness substitute its own backing store.

/// Main memory implementations.
pub mod memory;

/// Main memory trait definition.
pub mod traits;

pub use memory::FlatMemory;
pub use traits::MainMemory;
