//! Execution units and functional components.
//!
//! This module contains the integer ALU, the multiply/divide unit, the branch
//! prediction unit, and the cache hierarchy.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch prediction unit: gshare predictor and BTB.
pub mod bru;

/// Cache hierarchy implementation (L1I, L1D, L2) with LRU replacement and MSHRs.
pub mod cache;

/// Multiply/divide unit with its busy countdown.
pub mod muldiv;
