//! Branch Target Buffer.
//!
//! Direct-mapped on `pc >> 2`. Fetch consults it before the instruction word is
//! decoded, so a hit both identifies the PC as a control transfer and supplies its
//! taken-path destination. Execute rewrites the indexed entry after every resolved
//! branch or jump; a different PC mapping to the same index simply replaces it.

/// One BTB slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BtbEntry {
    /// Full PC of the branch that owns this entry.
    pub addr: u32,
    /// Taken-path destination recorded at the last resolution.
    pub target: u32,
    /// Slot has been written at least once.
    pub valid: bool,
    /// The branch always transfers control (J, JAL, JR, JALR).
    pub is_unconditional: bool,
}

/// Target table indexed by word address.
#[derive(Clone, Debug)]
pub struct Btb {
    table: Vec<BtbEntry>,
}

impl Btb {
    /// Builds an empty table of `size` slots (a power of two; `Config::validate` checks it).
    pub fn new(size: usize) -> Self {
        Self {
            table: vec![BtbEntry::default(); size],
        }
    }

    /// Slot for `pc`: the word address modulo the table size.
    pub fn index(&self, pc: u32) -> usize {
        (pc >> 2) as usize & (self.table.len() - 1)
    }

    /// Returns the slot for `pc` only when it is valid and was written by `pc` itself.
    pub fn lookup(&self, pc: u32) -> Option<BtbEntry> {
        self.table
            .get(self.index(pc))
            .copied()
            .filter(|e| e.valid && e.addr == pc)
    }

    /// Records `target` for `pc`, replacing whatever held the slot.
    pub fn update(&mut self, pc: u32, target: u32, is_unconditional: bool) {
        let idx = self.index(pc);
        if let Some(entry) = self.table.get_mut(idx) {
            *entry = BtbEntry {
                addr: pc,
                target,
                valid: true,
                is_unconditional,
            };
        }
    }
}
