//! Simulation context and program loading.
//!
//! Provides the `Simulator` that pairs the pipeline engine with its backing
//! memory, and the loader that places a hex program image into that memory.

/// Hex program image loader.
pub mod loader;

/// Top-level simulation context.
pub mod simulator;

pub use loader::{load_hex_file, load_hex_program};
pub use simulator::Simulator;
