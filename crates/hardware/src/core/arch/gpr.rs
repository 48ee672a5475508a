//! MIPS integer registers `$0`-`$31`.
//!
//! `$zero` is hardwired: reads return 0 and writes are dropped. Writeback is the
//! only stage that writes here; execute reads through the bypass network.

use crate::common::constants::NUM_GPRS;

/// The 32 integer registers.
#[derive(Clone, Debug, Default)]
pub struct Gpr {
    regs: [u32; NUM_GPRS],
}

impl Gpr {
    /// All registers zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of register `idx`. `$zero` and indices past `$31` read as 0.
    pub fn read(&self, idx: usize) -> u32 {
        self.regs.get(idx).copied().filter(|_| idx != 0).unwrap_or(0)
    }

    /// Sets register `idx`; a write to `$zero` has no effect.
    pub fn write(&mut self, idx: usize, val: u32) {
        if let Some(slot) = self.regs.get_mut(idx).filter(|_| idx != 0) {
            *slot = val;
        }
    }

    /// Logs the register file four to a line at `trace` level.
    pub fn dump(&self) {
        for (row, chunk) in self.regs.chunks(4).enumerate() {
            let base = row * 4;
            tracing::trace!(
                "${:<2} {:#010x} {:#010x} {:#010x} {:#010x}",
                base,
                chunk[0],
                chunk[1],
                chunk[2],
                chunk[3]
            );
        }
    }
}
