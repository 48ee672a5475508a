//! MIPS pipeline timing simulator library.
//!
//! This crate determines *when* the effects of each instruction become visible on a
//! five-stage in-order MIPS pipeline. It models the following:
//! 1. **Core:** Fetch, decode, execute, memory and writeback stages with operand bypassing,
//!    load-use and multiplier stalls, and branch-misprediction recovery.
//! 2. **Branch prediction:** A gshare direction predictor paired with a direct-mapped BTB.
//! 3. **Memory:** L1 instruction and data caches backed by an L2 with MSHR-based
//!    non-blocking miss handling and a per-request latency state machine.
//! 4. **ISA:** Field extraction and opcode tables for the MIPS32 integer subset.
//! 5. **Simulation:** Configuration, program loading, the simulation context and statistics.

/// Common types and constants (address decomposition, registers, errors).
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Processor core (architectural registers, pipeline engine, functional units).
pub mod core;
/// Instruction set (opcode tables and instruction field extraction).
pub mod isa;
/// Simulation context and program loader.
pub mod sim;
/// Functional memory collaborator (flat word store behind a trait).
pub mod soc;
/// Simulation statistics counters.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Crate-wide error type and result alias.
pub use crate::common::error::{Result, SimError};
/// Pipeline engine; owns the stage slots, register file, predictor and caches.
pub use crate::core::PipelineEngine;
/// Top-level simulation context driven one cycle at a time.
pub use crate::sim::Simulator;
