//! Simulator: owns the pipeline engine and the main memory side-by-side.
//!
//! Keeping the backing store outside the engine lets each cycle hand it to the cache
//! hierarchy as a plain `&mut dyn MainMemory`, and lets a harness substitute its own
//! store (a counting mock, a preloaded image) without touching the engine.

use crate::common::error::Result;
use crate::config::Config;
use crate::core::pipeline::engine::PipelineEngine;
use crate::soc::memory::FlatMemory;
use crate::soc::traits::MainMemory;
use crate::stats::{MemoryStats, SimStats};

/// Top-level simulator: pipeline engine + main memory.
#[derive(Debug)]
pub struct Simulator<M: MainMemory = FlatMemory> {
    engine: PipelineEngine,
    memory: M,
}

impl<M: MainMemory> Simulator<M> {
    /// Builds a simulator around an already-loaded memory image.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidConfig` if `config` fails validation.
    pub fn init(config: &Config, memory: M) -> Result<Self> {
        Ok(Self {
            engine: PipelineEngine::init(config)?,
            memory,
        })
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by a pipeline stage.
    pub fn cycle(&mut self) -> Result<()> {
        self.engine.cycle(&mut self.memory)
    }

    /// Cycles until the halt syscall retires or `max_cycles` have elapsed.
    ///
    /// If the program halts during this call, the final counters are logged.
    ///
    /// # Arguments
    ///
    /// * `max_cycles` - Upper bound on cycles run by this call.
    ///
    /// # Returns
    ///
    /// The number of cycles actually run.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by a pipeline stage.
    pub fn run(&mut self, max_cycles: u64) -> Result<u64> {
        let mut ran = 0;
        while ran < max_cycles && self.engine.is_running() {
            self.cycle()?;
            ran += 1;
        }
        if self.engine.is_running() {
            tracing::warn!(max_cycles, pc = format_args!("{:#010x}", self.engine.pc()), "cycle limit reached");
        } else if ran > 0 {
            self.log_summary();
        }
        Ok(ran)
    }

    /// Logs the pipeline and cache counters at `info` level.
    pub fn log_summary(&self) {
        self.engine.stats().log_summary();
        self.engine.memory_stats().log_summary();
    }

    /// Halts the machine and releases cache storage.
    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Returns `true` until the machine halts.
    pub const fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Current fetch PC.
    pub const fn pc(&self) -> u32 {
        self.engine.pc()
    }

    /// Value of general-purpose register `idx`.
    pub fn register(&self, idx: usize) -> u32 {
        self.engine.regs().read(idx)
    }

    /// Value of HI.
    pub const fn hi(&self) -> u32 {
        self.engine.regs().hi
    }

    /// Value of LO.
    pub const fn lo(&self) -> u32 {
        self.engine.regs().lo
    }

    /// Pipeline counters.
    pub const fn stats(&self) -> &SimStats {
        self.engine.stats()
    }

    /// Cache hierarchy counters.
    pub fn memory_stats(&self) -> MemoryStats {
        self.engine.memory_stats()
    }

    /// The pipeline engine.
    pub const fn engine(&self) -> &PipelineEngine {
        &self.engine
    }

    /// The backing memory.
    ///
    /// Dirty blocks still held in L1D or L2 have not been written here yet.
    pub const fn memory(&self) -> &M {
        &self.memory
    }
}
