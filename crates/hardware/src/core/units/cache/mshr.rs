//! Miss Status Holding Registers.
//!
//! A bounded table of outstanding L2 misses. At most one valid entry exists per
//! block address; an entry is marked done when the DRAM access finishes and is
//! released only after the fill has been installed. The table is scanned linearly
//! (O(capacity) per lookup), which is cheap at the sizes configured.

/// One outstanding miss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MshrEntry {
    /// Entry is tracking a miss.
    pub valid: bool,
    /// DRAM has returned the data; the fill is in flight to L2.
    pub done: bool,
    /// Block-aligned address of the miss.
    pub addr: u32,
}

/// Fixed-capacity MSHR table.
#[derive(Clone, Debug)]
pub struct MshrTable {
    entries: Vec<MshrEntry>,
}

impl MshrTable {
    /// Creates a table with `capacity` free entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![MshrEntry::default(); capacity],
        }
    }

    /// Total entry count.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of valid entries.
    pub fn outstanding(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Finds the valid entry tracking `addr`.
    pub fn find(&self, addr: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.valid && e.addr == addr)
    }

    /// Claims a free entry for `addr`.
    ///
    /// # Returns
    ///
    /// The entry index, or `None` if the table is full or `addr` already has an entry.
    /// Callers check `find` first so that a second miss merges onto the existing entry.
    pub fn allocate(&mut self, addr: u32) -> Option<usize> {
        if self.find(addr).is_some() {
            return None;
        }
        let idx = self.entries.iter().position(|e| !e.valid)?;
        self.entries[idx] = MshrEntry {
            valid: true,
            done: false,
            addr,
        };
        Some(idx)
    }

    /// Marks an entry's DRAM access as complete.
    pub fn mark_done(&mut self, idx: usize) {
        if let Some(entry) = self.entries.get_mut(idx) {
            entry.done = true;
        }
    }

    /// Invalidates an entry after its fill has been installed.
    pub fn release(&mut self, idx: usize) {
        if let Some(entry) = self.entries.get_mut(idx) {
            *entry = MshrEntry::default();
        }
    }

    /// Returns the entry at `idx`.
    pub fn entry(&self, idx: usize) -> Option<&MshrEntry> {
        self.entries.get(idx)
    }

    /// Invalidates every entry.
    pub fn clear(&mut self) {
        self.entries.fill(MshrEntry::default());
    }
}
