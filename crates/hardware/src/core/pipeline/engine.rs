//! Pipeline Engine.
//!
//! The engine owns every piece of per-run state: the architectural registers, the
//! fetch PC, the four inter-stage latches, the branch predictor, the multiply/divide
//! unit and the cache hierarchy. One `cycle` call is one clock:
//!
//! 1. **Miss Handling:** The memory hierarchy advances its outstanding requests.
//! 2. **Stages:** Writeback, Memory, Execute, Decode, Fetch run in that order, so each
//!    stage sees the start-of-cycle contents of the latch in front of it.
//! 3. **Recovery:** A recovery scheduled during the cycle redirects fetch and flushes
//!    the younger latches.
//! 4. **Teardown:** If writeback retired the halt syscall, cache storage is released.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::Result;
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::core::pipeline::latches::Latch;
use crate::core::pipeline::stages::{Decode, Execute, Fetch, Memory, Writeback};
use crate::core::pipeline::traits::{PipelineLatch, PipelineStage};
use crate::core::units::bru::gshare::GSharePredictor;
use crate::core::units::cache::hierarchy::{CacheKind, MemoryHierarchy};
use crate::core::units::muldiv::MulDivUnit;
use crate::soc::traits::MainMemory;
use crate::stats::{MemoryStats, SimStats};

/// How many latches a recovery empties, counted from the youngest.
///
/// Each depth includes every shallower one: `Execute` empties the decode and
/// execute latches, `Writeback` empties all four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FlushDepth {
    /// Decode latch only.
    Decode = 2,
    /// Decode and execute latches (branch misprediction).
    Execute = 3,
    /// Through the memory latch.
    Memory = 4,
    /// Every latch.
    Writeback = 5,
}

/// A recovery scheduled for the end of the current cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recovery {
    /// Latches to empty.
    pub depth: FlushDepth,
    /// PC fetch resumes from.
    pub target: u32,
}

/// Five-stage in-order pipeline with its caches and predictor.
#[derive(Debug)]
pub struct PipelineEngine {
    /// Architectural registers and HI/LO.
    pub regs: RegisterFile,
    /// Fetch program counter.
    pub pc: u32,
    /// Decode input (written by fetch).
    pub decode_latch: Latch,
    /// Execute input (written by decode).
    pub execute_latch: Latch,
    /// Memory input (written by execute).
    pub mem_latch: Latch,
    /// Writeback input (written by memory).
    pub wb_latch: Latch,
    /// Recovery to apply at the end of this cycle.
    pub recovery: Option<Recovery>,
    /// Multiply/divide unit and its busy countdown.
    pub muldiv: MulDivUnit,
    /// Direction predictor and BTB.
    pub predictor: GSharePredictor,
    /// L1I, L1D, L2 and outstanding requests.
    pub memory: MemoryHierarchy,
    /// Cleared when the halt syscall retires.
    pub running: bool,
    /// Pipeline counters.
    pub stats: SimStats,
    released: bool,
    trace: bool,
}

impl PipelineEngine {
    /// Validates `config` and builds a zeroed machine with fetch at `general.start_pc`.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidConfig` if any geometry is not a power of two or is zero.
    pub fn init(config: &Config) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            start_pc = format_args!("{:#010x}", config.general.start_pc),
            block_words = config.cache.block_words,
            mshr_entries = config.cache.mshr_entries,
            "pipeline initialised"
        );
        Ok(Self {
            regs: RegisterFile::new(),
            pc: config.general.start_pc,
            decode_latch: Latch::default(),
            execute_latch: Latch::default(),
            mem_latch: Latch::default(),
            wb_latch: Latch::default(),
            recovery: None,
            muldiv: MulDivUnit::new(
                config.pipeline.multiply_latency,
                config.pipeline.divide_latency,
            ),
            predictor: GSharePredictor::new(config.pipeline.btb_size),
            memory: MemoryHierarchy::new(config),
            running: true,
            stats: SimStats::default(),
            released: false,
            trace: config.general.trace,
        })
    }

    /// Advances the machine by one clock.
    ///
    /// Does nothing once the machine has halted.
    ///
    /// # Arguments
    ///
    /// * `mem` - Backing store behind the L2.
    ///
    /// # Errors
    ///
    /// Propagates `SimError::StoreNotResident` from the memory stage.
    pub fn cycle(&mut self, mem: &mut dyn MainMemory) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.stats.cycles += 1;

        self.memory.tick(mem);

        self.run_stage::<Writeback>()?;
        self.run_stage::<Memory>()?;
        self.run_stage::<Execute>()?;
        self.run_stage::<Decode>()?;
        self.run_stage::<Fetch>()?;

        self.apply_recovery();

        if self.trace {
            self.dump_latches();
        }

        if !self.running {
            self.stop();
        }
        Ok(())
    }

    fn run_stage<S: PipelineStage>(&mut self) -> Result<()> {
        let _span = tracing::trace_span!("stage", name = S::NAME).entered();
        S::tick(self)
    }

    /// Schedules a recovery for the end of this cycle.
    ///
    /// Only the first request in a cycle is kept: stages run oldest-instruction
    /// first, so the first caller holds the oldest mispredicted instruction. Requests
    /// after a halt in the same cycle are dropped.
    ///
    /// # Arguments
    ///
    /// * `depth` - Latches to empty.
    /// * `target` - PC fetch resumes from.
    pub fn recover(&mut self, depth: FlushDepth, target: u32) {
        if self.recovery.is_some() || !self.running {
            return;
        }
        tracing::debug!(
            ?depth,
            target = format_args!("{target:#010x}"),
            cycle = self.stats.cycles,
            "recovery scheduled"
        );
        self.recovery = Some(Recovery { depth, target });
    }

    fn apply_recovery(&mut self) {
        let Some(Recovery { depth, target }) = self.recovery.take() else {
            return;
        };

        if self.pc != target {
            self.memory.cancel_wait(CacheKind::Instruction);
        }
        self.pc = target;

        if depth >= FlushDepth::Decode {
            self.decode_latch.flush();
        }
        if depth >= FlushDepth::Execute {
            self.execute_latch.flush();
        }
        if depth >= FlushDepth::Memory {
            self.mem_latch.flush();
        }
        if depth >= FlushDepth::Writeback {
            self.wb_latch.flush();
        }

        self.stats.squashes += 1;
    }

    /// Halts the machine and releases all cache storage.
    ///
    /// Idempotent; called automatically at the end of the cycle that retires the
    /// halt syscall.
    pub fn stop(&mut self) {
        if self.released {
            return;
        }
        self.running = false;
        self.recovery = None;
        self.decode_latch.flush();
        self.execute_latch.flush();
        self.mem_latch.flush();
        self.wb_latch.flush();
        self.memory.release();
        self.released = true;
        self.regs.dump();
        tracing::info!(
            cycles = self.stats.cycles,
            retired = self.stats.instructions_retired,
            pc = format_args!("{:#010x}", self.pc),
            "pipeline stopped"
        );
    }

    fn dump_latches(&self) {
        let show = |latch: &Latch| latch.peek().map(|op| op.pc);
        tracing::trace!(
            cycle = self.stats.cycles,
            pc = format_args!("{:#010x}", self.pc),
            decode = ?show(&self.decode_latch),
            execute = ?show(&self.execute_latch),
            mem = ?show(&self.mem_latch),
            wb = ?show(&self.wb_latch),
            "latches"
        );
    }

    /// Returns `true` until the halt syscall retires or `stop` is called.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Current fetch PC.
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Architectural register file.
    pub const fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Pipeline counters.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Cache hierarchy counters.
    pub fn memory_stats(&self) -> MemoryStats {
        self.memory.stats()
    }

    /// Address of the instruction after `pc`.
    pub(crate) const fn next_sequential(pc: u32) -> u32 {
        pc.wrapping_add(INSTRUCTION_SIZE)
    }
}
