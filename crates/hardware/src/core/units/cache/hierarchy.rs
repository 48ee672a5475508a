//! Memory Hierarchy.
//!
//! Composes the L1 instruction cache, the L1 data cache, the unified L2 (which owns
//! the MSHR table) and main memory. It provides:
//! 1. **Lookup:** `load` answers from L1 in the same cycle or opens/joins a pending request.
//! 2. **Miss Handling:** `tick` advances every pending request one cycle through
//!    `NotStalled → StalledOnL2Hit` or
//!    `NotStalled → StalledOnDramRequest → StalledOnDram → StalledOnDramResponse`.
//! 3. **Write-Back:** Dirty L1D victims go to L2 when the block is resident there,
//!    otherwise straight to memory; dirty L2 victims go to memory.
//! 4. **Stores:** `store` writes a word into a resident L1D block.
//!
//! A miss on a block that already holds an MSHR for the other L1 interface does not
//! take a second MSHR. It parks in `MergedOnMshr` and completes from L2 on the cycle
//! the owning request installs the fill.
//!
//! `tick` runs once at the start of every cycle, before any pipeline stage issues a
//! lookup, so a stage sees its block in L1 on the same cycle its request completes.
//! A request counts a stall cycle only when its counter is non-zero on entry; when it
//! reaches zero the state transition happens in that same tick.

use super::Cache;
use crate::common::addr::AddressLayout;
use super::request::{PendingRequest, RequestQueue, RequestState};
use crate::common::error::{Result, SimError};
use crate::config::{Config, MemoryConfig};
use crate::soc::traits::MainMemory;
use crate::stats::MemoryStats;

/// Which L1 interface a lookup goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheKind {
    /// Instruction fetch through L1I.
    Instruction,
    /// Data access through L1D.
    Data,
}

/// Result of a `load`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// The word is available this cycle.
    Ready(u32),
    /// The block is being fetched; ask again next cycle.
    Pending,
}

/// L1I + L1D + L2 with non-blocking miss handling.
#[derive(Debug)]
pub struct MemoryHierarchy {
    l1i: Cache,
    l1d: Cache,
    l2: Cache,
    inst_queue: RequestQueue,
    data_queue: RequestQueue,
    timing: MemoryConfig,
    counters: MissCounters,
}

#[derive(Clone, Copy, Debug, Default)]
struct MissCounters {
    mshr_retries: u64,
    queue_growths: u64,
    coalesced: u64,
}

impl MemoryHierarchy {
    /// Builds an empty hierarchy from a validated configuration.
    pub fn new(config: &Config) -> Self {
        let cache = &config.cache;
        Self {
            l1i: Cache::new("L1I", &cache.l1_i, cache.block_words, None),
            l1d: Cache::new("L1D", &cache.l1_d, cache.block_words, None),
            l2: Cache::new("L2", &cache.l2, cache.block_words, Some(cache.mshr_entries)),
            inst_queue: RequestQueue::new(config.memory.request_queue_capacity),
            data_queue: RequestQueue::new(config.memory.request_queue_capacity),
            timing: config.memory.clone(),
            counters: MissCounters::default(),
        }
    }

    /// L1 instruction cache.
    pub const fn l1i(&self) -> &Cache {
        &self.l1i
    }

    /// L1 data cache.
    pub const fn l1d(&self) -> &Cache {
        &self.l1d
    }

    /// Unified L2.
    pub const fn l2(&self) -> &Cache {
        &self.l2
    }

    /// Request queue behind one L1 interface.
    pub const fn queue(&self, kind: CacheKind) -> &RequestQueue {
        match kind {
            CacheKind::Instruction => &self.inst_queue,
            CacheKind::Data => &self.data_queue,
        }
    }

    /// Snapshot of every hierarchy counter.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            l1i: self.l1i.stats,
            l1d: self.l1d.stats,
            l2: self.l2.stats,
            mshr_retries: self.counters.mshr_retries,
            queue_growths: self.counters.queue_growths,
            coalesced: self.counters.coalesced,
        }
    }

    /// Looks up the word at `addr` through the L1 selected by `kind`.
    ///
    /// An L1 hit returns the word immediately and updates LRU. A miss opens a
    /// request for the block (or joins the one already open) and marks the block as
    /// the one this interface is waiting on; the caller polls again next cycle.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address; the containing word is returned.
    /// * `kind` - Instruction or data side.
    pub fn load(&mut self, addr: u32, kind: CacheKind) -> LoadStatus {
        let Self {
            l1i,
            l1d,
            l2,
            inst_queue,
            data_queue,
            timing,
            counters,
        } = self;
        let (l1, queue) = match kind {
            CacheKind::Instruction => (l1i, inst_queue),
            CacheKind::Data => (l1d, data_queue),
        };

        if let Some(word) = l1.read_word(addr) {
            queue.stop_waiting();
            return LoadStatus::Ready(word);
        }

        let block = l1.layout().block_base(addr);
        if queue.find(block).is_some() {
            if queue.waiting_on() != Some(block) {
                counters.coalesced += 1;
                tracing::trace!(cache = l1.name(), block = format_args!("{block:#010x}"), "coalesced");
            }
        } else {
            l1.stats.misses += 1;
            let (idx, grew) = queue.claim(block);
            if grew {
                counters.queue_growths += 1;
                tracing::debug!(cache = l1.name(), capacity = queue.capacity(), "request queue grown");
            }
            tracing::debug!(cache = l1.name(), block = format_args!("{block:#010x}"), "miss");
            let resolved = queue
                .entry_mut(idx)
                .is_some_and(|entry| issue(entry, l1, l2, timing, counters));
            if resolved {
                queue.free(idx);
            }
        }

        queue.wait_for(block);
        LoadStatus::Pending
    }

    /// Writes `value` to the word at `addr` in L1D.
    ///
    /// # Errors
    ///
    /// `SimError::StoreNotResident` if the block is not in L1D.
    pub fn store(&mut self, addr: u32, value: u32) -> Result<()> {
        if self.l1d.write_word(addr, value) {
            Ok(())
        } else {
            Err(SimError::StoreNotResident { addr })
        }
    }

    /// Advances every pending request by one cycle.
    ///
    /// # Arguments
    ///
    /// * `mem` - Backing store for fills and write-backs.
    pub fn tick(&mut self, mem: &mut dyn MainMemory) {
        let Self {
            l1i,
            l1d,
            l2,
            inst_queue,
            data_queue,
            timing,
            counters,
        } = self;
        advance_queue(inst_queue, l1i, l2, timing, counters, mem);
        advance_queue(data_queue, l1d, l2, timing, counters, mem);
        complete_merged(inst_queue, l1i, l2, mem);
        complete_merged(data_queue, l1d, l2, mem);
    }

    /// Stops gating `kind`'s stage on its awaited block. The request itself keeps draining.
    pub fn cancel_wait(&mut self, kind: CacheKind) {
        match kind {
            CacheKind::Instruction => self.inst_queue.stop_waiting(),
            CacheKind::Data => self.data_queue.stop_waiting(),
        }
    }

    /// Releases all cache storage and drops every pending request.
    pub fn release(&mut self) {
        self.l1i.release();
        self.l1d.release();
        self.l2.release();
        self.inst_queue.clear();
        self.data_queue.clear();
        tracing::info!("cache storage released");
    }
}

/// Runs the `NotStalled` step for one request.
///
/// # Returns
///
/// `true` if the block is already in L1 and the request can be freed.
fn issue(
    entry: &mut PendingRequest,
    l1: &Cache,
    l2: &mut Cache,
    timing: &MemoryConfig,
    counters: &mut MissCounters,
) -> bool {
    if l1.contains(entry.addr) {
        return true;
    }

    if l2.contains(entry.addr) {
        l2.stats.hits += 1;
        entry.state = RequestState::StalledOnL2Hit;
        entry.stall = timing.l2_hit_latency;
        return false;
    }

    let mshr = match l2.mshr_mut() {
        Some(table) => {
            if let Some(owner) = table.find(entry.addr) {
                counters.coalesced += 1;
                tracing::trace!(block = format_args!("{:#010x}", entry.addr), mshr = owner, "merged onto MSHR");
                entry.state = RequestState::MergedOnMshr;
                return false;
            }
            let Some(idx) = table.allocate(entry.addr) else {
                counters.mshr_retries += 1;
                tracing::trace!(block = format_args!("{:#010x}", entry.addr), "MSHR unavailable, retrying");
                return false;
            };
            Some(idx)
        }
        None => None,
    };

    l2.stats.misses += 1;
    tracing::debug!(
        block = format_args!("{:#010x}", entry.addr),
        mshr = ?mshr,
        "L2 miss"
    );
    entry.mshr = mshr;
    entry.state = RequestState::StalledOnDramRequest;
    entry.stall = timing.l2_to_dram_latency;
    false
}

/// Advances every valid entry of one queue by a cycle.
fn advance_queue(
    queue: &mut RequestQueue,
    l1: &mut Cache,
    l2: &mut Cache,
    timing: &MemoryConfig,
    counters: &mut MissCounters,
    mem: &mut dyn MainMemory,
) {
    let waiting_on = queue.waiting_on();
    for idx in 0..queue.capacity() {
        let Some(entry) = queue.entry_mut(idx) else {
            continue;
        };
        if !entry.valid {
            continue;
        }
        if entry.stall > 0 {
            entry.stall -= 1;
            if entry.stall > 0 {
                continue;
            }
        }

        let done = match entry.state {
            RequestState::NotStalled => issue(entry, l1, l2, timing, counters),
            RequestState::MergedOnMshr => false,
            RequestState::StalledOnL2Hit => {
                let data = match l2.read_block(entry.addr) {
                    Some(data) => data,
                    None => read_from_memory(mem, l2.layout(), entry.addr),
                };
                fill_l1(l1, l2, entry.addr, &data, mem);
                true
            }
            RequestState::StalledOnDramRequest => {
                entry.state = RequestState::StalledOnDram;
                entry.stall = timing.dram_latency;
                false
            }
            RequestState::StalledOnDram => {
                entry.state = RequestState::StalledOnDramResponse;
                entry.stall = timing.dram_to_l2_latency;
                if let (Some(mshr), Some(table)) = (entry.mshr, l2.mshr_mut()) {
                    table.mark_done(mshr);
                }
                false
            }
            RequestState::StalledOnDramResponse => {
                let data = read_from_memory(mem, l2.layout(), entry.addr);
                if !l2.contains(entry.addr) {
                    if let Some(victim) = l2.install(entry.addr, &data) {
                        mem.write_block(l2.layout(), victim.addr, &victim.data);
                    }
                }
                if let (Some(mshr), Some(table)) = (entry.mshr.take(), l2.mshr_mut()) {
                    table.release(mshr);
                }
                if waiting_on == Some(entry.addr) {
                    fill_l1(l1, l2, entry.addr, &data, mem);
                }
                true
            }
        };

        if done {
            queue.free(idx);
        }
    }
}

/// Completes every `MergedOnMshr` request whose MSHR was released this cycle.
///
/// Runs after both queues have advanced, so the fill is already in L2. If another
/// fill evicted the block in the same cycle, the request goes back to `NotStalled`.
fn complete_merged(queue: &mut RequestQueue, l1: &mut Cache, l2: &mut Cache, mem: &mut dyn MainMemory) {
    let waiting_on = queue.waiting_on();
    for idx in 0..queue.capacity() {
        let Some(addr) = queue
            .entry(idx)
            .filter(|e| e.valid && e.state == RequestState::MergedOnMshr)
            .map(|e| e.addr)
        else {
            continue;
        };
        if l2.mshr().is_some_and(|table| table.find(addr).is_some()) {
            continue;
        }

        let Some(data) = l2.read_block(addr) else {
            if let Some(entry) = queue.entry_mut(idx) {
                entry.state = RequestState::NotStalled;
            }
            continue;
        };
        if waiting_on == Some(addr) {
            fill_l1(l1, l2, addr, &data, mem);
        }
        queue.free(idx);
    }
}

fn read_from_memory(mem: &dyn MainMemory, layout: &AddressLayout, base: u32) -> Box<[u32]> {
    let mut data = vec![0; layout.block_words()].into_boxed_slice();
    mem.read_block(layout, base, &mut data);
    data
}

/// Installs a block into an L1, routing a dirty victim to L2 or memory.
fn fill_l1(l1: &mut Cache, l2: &mut Cache, addr: u32, data: &[u32], mem: &mut dyn MainMemory) {
    if l1.contains(addr) {
        return;
    }
    if let Some(victim) = l1.install(addr, data) {
        if !l2.absorb_writeback(victim.addr, &victim.data) {
            mem.write_block(l1.layout(), victim.addr, &victim.data);
        }
    }
}
