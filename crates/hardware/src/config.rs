//! Configuration system for the pipeline timing simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline geometry and latency constants for the caches, predictor and pipeline.
//! 2. **Structures:** Hierarchical config for general, pipeline, cache, and memory-timing settings.
//! 3. **Validation:** Power-of-two and non-zero checks applied before any state is allocated.
//!
//! Configuration is supplied as JSON via `Config::from_json`, or use `Config::default()`.

use serde::Deserialize;

use crate::common::constants::{DEFAULT_START_PC, DIVIDE_LATENCY, MULTIPLY_LATENCY};
use crate::common::error::{Result, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Cache block size in 32-bit words (32 bytes).
    pub const BLOCK_WORDS: usize = 8;

    /// L1 instruction cache set count.
    pub const L1I_SETS: usize = 64;

    /// L1 instruction cache associativity.
    pub const L1I_WAYS: usize = 4;

    /// L1 data cache set count.
    pub const L1D_SETS: usize = 256;

    /// L1 data cache associativity.
    pub const L1D_WAYS: usize = 8;

    /// Unified L2 set count.
    pub const L2_SETS: usize = 512;

    /// Unified L2 associativity.
    pub const L2_WAYS: usize = 16;

    /// Outstanding L2 misses tracked by the MSHR table.
    pub const MSHR_ENTRIES: usize = 16;

    /// Cycles an L1 miss that hits in L2 waits before the block is installed in L1.
    pub const L2_HIT_LATENCY: u32 = 15;

    /// Cycles for an L2 miss to reach the DRAM controller.
    pub const L2_TO_DRAM_LATENCY: u32 = 5;

    /// DRAM array access time in cycles.
    pub const DRAM_LATENCY: u32 = 50;

    /// Cycles for a DRAM fill to travel back to L2.
    pub const DRAM_TO_L2_LATENCY: u32 = 5;

    /// Initial entry count of each outstanding-request queue.
    pub const REQUEST_QUEUE_CAPACITY: usize = 4;

    /// Branch Target Buffer entry count.
    pub const BTB_SIZE: usize = 1024;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use pipesim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.start_pc, 0x0040_0000);
/// assert_eq!(config.cache.l1_d.sets, 256);
/// ```
///
/// Partial JSON documents fall back to defaults for every omitted field:
///
/// ```
/// use pipesim_core::config::Config;
///
/// let config = Config::from_json(r#"{
///     "cache": { "block_words": 4, "l2": { "sets": 128, "ways": 8 } },
///     "memory": { "dram_latency": 100 }
/// }"#).unwrap();
/// assert_eq!(config.cache.block_words, 4);
/// assert_eq!(config.cache.l2.ways, 8);
/// assert_eq!(config.cache.l1_i.sets, 64);
/// assert_eq!(config.memory.dram_latency, 100);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Branch predictor and functional-unit timing
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Cache geometry
    #[serde(default)]
    pub cache: CacheHierarchyConfig,
    /// Miss-handling latencies and queue sizing
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// The result is not validated; `PipelineEngine::init` validates before allocating.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON text.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or `SimError::ConfigParse`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every structural constraint the simulator relies on.
    ///
    /// Set counts, the block size and the BTB size must be non-zero powers of two;
    /// associativity, MSHR capacity and queue capacity must be non-zero.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or `SimError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        power_of_two("cache.block_words", self.cache.block_words)?;
        self.cache.l1_i.validate("cache.l1_i.sets", "cache.l1_i.ways")?;
        self.cache.l1_d.validate("cache.l1_d.sets", "cache.l1_d.ways")?;
        self.cache.l2.validate("cache.l2.sets", "cache.l2.ways")?;
        non_zero("cache.mshr_entries", self.cache.mshr_entries)?;
        non_zero("memory.request_queue_capacity", self.memory.request_queue_capacity)?;
        power_of_two("pipeline.btb_size", self.pipeline.btb_size)?;
        Ok(())
    }
}

fn non_zero(field: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(SimError::InvalidConfig {
            field,
            value: 0,
            reason: "must be non-zero",
        });
    }
    Ok(())
}

fn power_of_two(field: &'static str, value: usize) -> Result<()> {
    if !value.is_power_of_two() {
        return Err(SimError::InvalidConfig {
            field,
            value: value as u64,
            reason: "must be a non-zero power of two",
        });
    }
    Ok(())
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Program counter at reset (defaults to the text segment base).
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,

    /// Dump the pipeline slots every cycle at `trace` level.
    #[serde(default)]
    pub trace: bool,
}

impl GeneralConfig {
    /// Returns the default starting program counter.
    fn default_start_pc() -> u32 {
        DEFAULT_START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: DEFAULT_START_PC,
            trace: false,
        }
    }
}

/// Pipeline-level configuration: branch target buffer sizing and mul/div busy time.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Branch Target Buffer entry count
    #[serde(default = "PipelineConfig::default_btb_size")]
    pub btb_size: usize,

    /// Busy cycles after MULT/MULTU
    #[serde(default = "PipelineConfig::default_multiply_latency")]
    pub multiply_latency: u32,

    /// Busy cycles after DIV/DIVU
    #[serde(default = "PipelineConfig::default_divide_latency")]
    pub divide_latency: u32,
}

impl PipelineConfig {
    fn default_btb_size() -> usize {
        defaults::BTB_SIZE
    }

    fn default_multiply_latency() -> u32 {
        MULTIPLY_LATENCY
    }

    fn default_divide_latency() -> u32 {
        DIVIDE_LATENCY
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            btb_size: defaults::BTB_SIZE,
            multiply_latency: MULTIPLY_LATENCY,
            divide_latency: DIVIDE_LATENCY,
        }
    }
}

/// Geometry of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Number of sets (power of two)
    pub sets: usize,
    /// Associativity
    pub ways: usize,
}

impl CacheConfig {
    /// Creates a geometry with the given set and way counts.
    pub const fn new(sets: usize, ways: usize) -> Self {
        Self { sets, ways }
    }

    fn validate(&self, sets_field: &'static str, ways_field: &'static str) -> Result<()> {
        power_of_two(sets_field, self.sets)?;
        non_zero(ways_field, self.ways)
    }
}

/// Cache hierarchy configuration.
///
/// All three levels share a single block size; every address shift is derived from it.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheHierarchyConfig {
    /// Block size in 32-bit words, shared by every level
    #[serde(default = "CacheHierarchyConfig::default_block_words")]
    pub block_words: usize,

    /// L1 instruction cache
    #[serde(default = "CacheHierarchyConfig::default_l1_i")]
    pub l1_i: CacheConfig,

    /// L1 data cache
    #[serde(default = "CacheHierarchyConfig::default_l1_d")]
    pub l1_d: CacheConfig,

    /// Unified L2
    #[serde(default = "CacheHierarchyConfig::default_l2")]
    pub l2: CacheConfig,

    /// MSHR capacity of the L2
    #[serde(default = "CacheHierarchyConfig::default_mshr_entries")]
    pub mshr_entries: usize,
}

impl CacheHierarchyConfig {
    fn default_block_words() -> usize {
        defaults::BLOCK_WORDS
    }

    fn default_l1_i() -> CacheConfig {
        CacheConfig::new(defaults::L1I_SETS, defaults::L1I_WAYS)
    }

    fn default_l1_d() -> CacheConfig {
        CacheConfig::new(defaults::L1D_SETS, defaults::L1D_WAYS)
    }

    fn default_l2() -> CacheConfig {
        CacheConfig::new(defaults::L2_SETS, defaults::L2_WAYS)
    }

    fn default_mshr_entries() -> usize {
        defaults::MSHR_ENTRIES
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            block_words: defaults::BLOCK_WORDS,
            l1_i: Self::default_l1_i(),
            l1_d: Self::default_l1_d(),
            l2: Self::default_l2(),
            mshr_entries: defaults::MSHR_ENTRIES,
        }
    }
}

/// Miss-handling latencies and outstanding-request queue sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Cycles spent in `StalledOnL2Hit`
    #[serde(default = "MemoryConfig::default_l2_hit_latency")]
    pub l2_hit_latency: u32,

    /// Cycles spent in `StalledOnDramRequest`
    #[serde(default = "MemoryConfig::default_l2_to_dram_latency")]
    pub l2_to_dram_latency: u32,

    /// Cycles spent in `StalledOnDram`
    #[serde(default = "MemoryConfig::default_dram_latency")]
    pub dram_latency: u32,

    /// Cycles spent in `StalledOnDramResponse`
    #[serde(default = "MemoryConfig::default_dram_to_l2_latency")]
    pub dram_to_l2_latency: u32,

    /// Initial capacity of each request queue; doubles on exhaustion
    #[serde(default = "MemoryConfig::default_request_queue_capacity")]
    pub request_queue_capacity: usize,
}

impl MemoryConfig {
    fn default_l2_hit_latency() -> u32 {
        defaults::L2_HIT_LATENCY
    }

    fn default_l2_to_dram_latency() -> u32 {
        defaults::L2_TO_DRAM_LATENCY
    }

    fn default_dram_latency() -> u32 {
        defaults::DRAM_LATENCY
    }

    fn default_dram_to_l2_latency() -> u32 {
        defaults::DRAM_TO_L2_LATENCY
    }

    fn default_request_queue_capacity() -> usize {
        defaults::REQUEST_QUEUE_CAPACITY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            l2_hit_latency: defaults::L2_HIT_LATENCY,
            l2_to_dram_latency: defaults::L2_TO_DRAM_LATENCY,
            dram_latency: defaults::DRAM_LATENCY,
            dram_to_l2_latency: defaults::DRAM_TO_L2_LATENCY,
            request_queue_capacity: defaults::REQUEST_QUEUE_CAPACITY,
        }
    }
}
