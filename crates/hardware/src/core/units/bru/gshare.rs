//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! The history register is 8 bits wide, which fixes the Pattern History Table at
//! 256 two-bit counters. Counters start at 0 (strongly not-taken). A BTB hit is
//! required for any taken prediction; unconditional entries are always predicted taken.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `update_direction()`: O(1)
//! - **Space Complexity:** 256 counters plus the BTB

use super::BranchPredictor;
use super::branch_predictor::Prediction;
use super::btb::Btb;
use crate::common::constants::INSTRUCTION_SIZE;

/// Width of the Global History Register in bits.
pub const HISTORY_BITS: u32 = 8;
/// Total number of entries in the PHT.
pub const PHT_SIZE: usize = 1 << HISTORY_BITS;
/// Largest counter value (strongly taken).
pub const COUNTER_MAX: u8 = 3;
/// Counters above this value predict taken.
const TAKEN_THRESHOLD: u8 = 1;

/// GShare Predictor structure.
#[derive(Clone, Debug)]
pub struct GSharePredictor {
    /// Global History Register storing recent branch outcomes.
    ghr: u8,
    /// Pattern History Table containing 2-bit saturating counters.
    pht: [u8; PHT_SIZE],
    /// Branch Target Buffer.
    btb: Btb,
}

impl GSharePredictor {
    /// Creates a new GShare Predictor with cleared history and counters.
    ///
    /// # Arguments
    ///
    /// * `btb_size` - BTB entry count (power of two).
    pub fn new(btb_size: usize) -> Self {
        Self {
            ghr: 0,
            pht: [0; PHT_SIZE],
            btb: Btb::new(btb_size),
        }
    }

    /// Calculates the index into the Pattern History Table.
    ///
    /// Computes `GHR ^ ((pc >> 2) & (PHT_SIZE - 1))`.
    pub fn pattern_index(&self, pc: u32) -> usize {
        usize::from(self.ghr) ^ ((pc >> 2) as usize & (PHT_SIZE - 1))
    }

    /// Current global history.
    pub const fn history(&self) -> u8 {
        self.ghr
    }

    /// Counter at a PHT index.
    pub fn counter(&self, idx: usize) -> u8 {
        self.pht[idx & (PHT_SIZE - 1)]
    }

    /// The branch target buffer.
    pub const fn btb(&self) -> &Btb {
        &self.btb
    }
}

impl BranchPredictor for GSharePredictor {
    fn predict(&self, pc: u32) -> Prediction {
        let fallthrough = pc.wrapping_add(INSTRUCTION_SIZE);
        let Some(entry) = self.btb.lookup(pc) else {
            return Prediction {
                is_branch: false,
                taken: false,
                next_pc: fallthrough,
            };
        };

        let taken = entry.is_unconditional || self.counter(self.pattern_index(pc)) > TAKEN_THRESHOLD;
        Prediction {
            is_branch: true,
            taken,
            next_pc: if taken { entry.target } else { fallthrough },
        }
    }

    /// Updates the 2-bit saturating counter in the PHT and shifts the new
    /// outcome into the Global History Register.
    fn update_direction(&mut self, pc: u32, taken: bool) {
        let idx = self.pattern_index(pc);
        let counter = &mut self.pht[idx];
        if taken {
            *counter = (*counter + 1).min(COUNTER_MAX);
        } else {
            *counter = counter.saturating_sub(1);
        }
        self.ghr = (self.ghr << 1) | u8::from(taken);
    }

    fn update_target(&mut self, pc: u32, target: u32, unconditional: bool) {
        self.btb.update(pc, target, unconditional);
    }
}
