//! Outstanding-Request Queues.
//!
//! Each L1 interface (instruction and data) owns one `RequestQueue`. An entry
//! tracks one block-aligned address from its L1 miss until the block reaches L1
//! (or, for an abandoned fetch, until the fill lands in L2). References to a block
//! that already has an entry coalesce onto it.
//!
//! The queue starts at a small capacity and doubles when every entry is busy.
//! Lookups are linear scans over the entries.

/// Miss-handling state of one request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    /// Not waiting on a latency; re-examined every cycle until it can progress.
    #[default]
    NotStalled,
    /// Hit in L2; waiting out the L2 hit latency before filling L1.
    StalledOnL2Hit,
    /// L2 miss with an MSHR; travelling to the DRAM controller.
    StalledOnDramRequest,
    /// DRAM array access in progress.
    StalledOnDram,
    /// DRAM data travelling back to L2.
    StalledOnDramResponse,
    /// L2 miss on a block whose MSHR belongs to the other L1 interface's request;
    /// completes from L2 on the cycle that MSHR is released.
    MergedOnMshr,
}

/// One queue entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingRequest {
    /// Entry is in use.
    pub valid: bool,
    /// Block-aligned target address.
    pub addr: u32,
    /// Current state.
    pub state: RequestState,
    /// Cycles left in the current state.
    pub stall: u32,
    /// MSHR held while the request is outstanding to DRAM.
    pub mshr: Option<usize>,
}

/// Growable queue of pending requests for one L1 interface.
#[derive(Clone, Debug)]
pub struct RequestQueue {
    entries: Vec<PendingRequest>,
    waiting_on: Option<u32>,
}

impl RequestQueue {
    /// Creates a queue with `capacity` free entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![PendingRequest::default(); capacity],
            waiting_on: None,
        }
    }

    /// Current capacity (grows by doubling).
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries in use.
    pub fn outstanding(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Finds the in-use entry for block address `block`.
    pub fn find(&self, block: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.valid && e.addr == block)
    }

    /// Claims a free entry for `block`, doubling the queue if all entries are busy.
    ///
    /// # Returns
    ///
    /// `(index, grew)` where `grew` reports whether the queue had to expand.
    pub fn claim(&mut self, block: u32) -> (usize, bool) {
        let (idx, grew) = match self.entries.iter().position(|e| !e.valid) {
            Some(idx) => (idx, false),
            None => {
                let idx = self.entries.len();
                let new_len = (idx * 2).max(1);
                self.entries.resize(new_len, PendingRequest::default());
                (idx, true)
            }
        };
        self.entries[idx] = PendingRequest {
            valid: true,
            addr: block,
            ..PendingRequest::default()
        };
        (idx, grew)
    }

    /// Returns the entry at `idx`.
    pub fn entry(&self, idx: usize) -> Option<&PendingRequest> {
        self.entries.get(idx)
    }

    /// Mutable access to the entry at `idx`.
    pub fn entry_mut(&mut self, idx: usize) -> Option<&mut PendingRequest> {
        self.entries.get_mut(idx)
    }

    /// Iterates over every slot, in use or not.
    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> {
        self.entries.iter()
    }

    /// Frees the entry at `idx`.
    pub fn free(&mut self, idx: usize) {
        if let Some(entry) = self.entries.get_mut(idx) {
            *entry = PendingRequest::default();
        }
    }

    /// Block address the owning pipeline stage is currently stalled on.
    pub const fn waiting_on(&self) -> Option<u32> {
        self.waiting_on
    }

    /// Records the block the owning stage is stalled on.
    pub fn wait_for(&mut self, block: u32) {
        self.waiting_on = Some(block);
    }

    /// Forgets the awaited block; outstanding entries keep draining.
    pub fn stop_waiting(&mut self) {
        self.waiting_on = None;
    }

    /// Drops every entry and the awaited block.
    pub fn clear(&mut self) {
        self.entries.fill(PendingRequest::default());
        self.waiting_on = None;
    }
}
