//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct, which holds all architectural
//! integer state visible to the pipeline:
//! 1. **General Purpose Registers:** 32 registers with `$zero` hardwired.
//! 2. **HI/LO:** The multiply/divide result pair.
//! 3. **Observability:** A `tracing` dump of the register state.

use crate::core::arch::gpr::Gpr;

/// Register file containing the 32 GPRs and the HI/LO pair.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    gpr: Gpr,
    /// High word of the last multiply, or the remainder of the last divide.
    pub hi: u32,
    /// Low word of the last multiply, or the quotient of the last divide.
    pub lo: u32,
}

impl RegisterFile {
    /// Creates a new register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register. `$zero` always reads 0.
    pub fn read(&self, idx: usize) -> u32 {
        self.gpr.read(idx)
    }

    /// Writes a general-purpose register. Writes to `$zero` are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        self.gpr.write(idx, val);
    }

    /// Emits the register state at `trace` level.
    pub fn dump(&self) {
        self.gpr.dump();
        tracing::trace!(hi = format_args!("{:#010x}", self.hi), lo = format_args!("{:#010x}", self.lo), "HI/LO");
    }
}
