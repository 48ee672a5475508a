//! Core processor implementation.
//!
//! This module contains the in-order pipeline and the functional units it drives:
//! the architectural register file, the five pipeline stages with their latches,
//! the branch predictor, the ALU and multiply/divide unit, and the cache hierarchy.

/// Architecture-specific components (register files).
pub mod arch;

/// Instruction pipeline implementation (stages, latches, hazards, engine).
pub mod pipeline;

/// Execution units (ALU, multiply/divide, branch prediction, caches).
pub mod units;

pub use self::pipeline::engine::PipelineEngine;
