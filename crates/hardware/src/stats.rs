//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline timing model. It provides:
//! 1. **Cycle and IPC:** Total cycles, fetched and retired instructions, and derived metrics (IPC, CPI).
//! 2. **Control flow:** Squashes, mispredictions, and resolved branch counts.
//! 3. **Stalls:** Data-hazard, multiplier, fetch-miss and memory-miss stall cycles.
//! 4. **Cache hierarchy:** Hit/miss/writeback counts per level plus miss-handling back-pressure.
//!
//! All structures derive `Serialize` so a harness can emit them as JSON; this crate
//! only logs a summary through `tracing`.

use serde::Serialize;

/// Pipeline statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Instructions handed from fetch to decode.
    pub instructions_fetched: u64,
    /// Instructions that completed writeback.
    pub instructions_retired: u64,
    /// Recoveries applied (each flushes the younger slots and redirects fetch).
    pub squashes: u64,
    /// Resolved branches whose outcome or target differed from the fetch-time prediction.
    pub branch_mispredictions: u64,
    /// Conditional branches resolved in execute.
    pub conditional_branches: u64,
    /// Unconditional jumps resolved in execute.
    pub unconditional_branches: u64,
    /// Cycles execute waited on a load result still in the memory stage.
    pub stalls_data: u64,
    /// Cycles execute waited on the multiply/divide unit.
    pub stalls_muldiv: u64,
    /// Cycles fetch waited on an instruction cache miss.
    pub stalls_fetch: u64,
    /// Cycles the memory stage waited on a data cache miss.
    pub stalls_mem: u64,
}

impl SimStats {
    /// Instructions retired per cycle (0.0 before the first cycle).
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Cycles per retired instruction (0.0 before the first retirement).
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Emits the pipeline counters at `info` level.
    pub fn log_summary(&self) {
        tracing::info!(
            cycles = self.cycles,
            fetched = self.instructions_fetched,
            retired = self.instructions_retired,
            ipc = format_args!("{:.4}", self.ipc()),
            squashes = self.squashes,
            mispredictions = self.branch_mispredictions,
            "pipeline summary"
        );
        tracing::info!(
            data = self.stalls_data,
            muldiv = self.stalls_muldiv,
            fetch = self.stalls_fetch,
            mem = self.stalls_mem,
            "stall cycles"
        );
    }
}

/// Counters for one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found the block resident.
    pub hits: u64,
    /// Primary misses (one per distinct request, not per polling cycle).
    pub misses: u64,
    /// Dirty blocks written to the next level on eviction.
    pub writebacks: u64,
}

impl CacheStats {
    /// Fraction of lookups that missed (0.0 when the level was never accessed).
    pub fn miss_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }
}

/// Memory hierarchy statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// L1 instruction cache.
    pub l1i: CacheStats,
    /// L1 data cache.
    pub l1d: CacheStats,
    /// Unified L2.
    pub l2: CacheStats,
    /// Cycles a request stayed `NotStalled` because no MSHR could be allocated.
    pub mshr_retries: u64,
    /// Times a request queue doubled its capacity.
    pub queue_growths: u64,
    /// New references merged onto an outstanding request for the same block.
    pub coalesced: u64,
}

impl MemoryStats {
    /// Emits the hierarchy counters at `info` level.
    pub fn log_summary(&self) {
        for (name, level) in [("L1-I", &self.l1i), ("L1-D", &self.l1d), ("L2", &self.l2)] {
            tracing::info!(
                cache = name,
                hits = level.hits,
                misses = level.misses,
                writebacks = level.writebacks,
                miss_rate = format_args!("{:.2}%", level.miss_rate() * 100.0),
                "cache"
            );
        }
        tracing::info!(
            mshr_retries = self.mshr_retries,
            queue_growths = self.queue_growths,
            coalesced = self.coalesced,
            "miss handling"
        );
    }
}
