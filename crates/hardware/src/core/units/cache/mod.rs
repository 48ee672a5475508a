//! Set-Associative Cache Model.
//!
//! This module implements the block store shared by the L1 instruction cache,
//! the L1 data cache and the L2. It provides:
//! 1. **Storage:** A `[set][way]` array of `CacheBlock`s holding real data words.
//! 2. **Lookup:** Tag match across the ways of one set, with LRU update on hit.
//! 3. **Fill:** Victim selection (first invalid way, else LRU) and dirty-victim capture.
//! 4. **Miss Handling:** The MSHR table, request queues and the hierarchy state machine.
//!
//! Every level derives its tag/set/offset split from one `AddressLayout`.

/// Memory hierarchy: L1I/L1D/L2 composition and the per-request miss state machine.
pub mod hierarchy;

/// Miss Status Holding Registers.
pub mod mshr;

/// Cache replacement policy implementations.
pub mod policies;

/// Outstanding-request queues.
pub mod request;

use self::mshr::MshrTable;
use self::policies::{LruPolicy, ReplacementPolicy};
use crate::common::addr::AddressLayout;
use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// One cache block: control bits plus `block_words` data words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheBlock {
    /// Block holds live data.
    pub valid: bool,
    /// Block has been written since it was filled.
    pub dirty: bool,
    /// Address tag.
    pub tag: u32,
    /// Block contents.
    pub data: Box<[u32]>,
}

/// A dirty block displaced by a fill; its contents must reach the next level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Block-aligned address the data belongs to.
    pub addr: u32,
    /// Block contents at eviction time.
    pub data: Box<[u32]>,
}

/// A set-associative, write-back cache.
pub struct Cache {
    name: &'static str,
    layout: AddressLayout,
    ways: usize,
    blocks: Vec<CacheBlock>,
    policy: Box<dyn ReplacementPolicy + Send + Sync>,
    mshr: Option<MshrTable>,
    /// Access counters.
    pub stats: CacheStats,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("name", &self.name)
            .field("layout", &self.layout)
            .field("ways", &self.ways)
            .field("mshr", &self.mshr)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Creates an empty cache with every block invalid and zeroed.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in trace output (`"L1I"`, `"L1D"`, `"L2"`).
    /// * `config` - Set and way counts.
    /// * `block_words` - Words per block, shared across the hierarchy.
    /// * `mshr_entries` - MSHR capacity, for the level that tracks outstanding misses.
    pub fn new(
        name: &'static str,
        config: &CacheConfig,
        block_words: usize,
        mshr_entries: Option<usize>,
    ) -> Self {
        let empty = CacheBlock {
            data: vec![0; block_words].into_boxed_slice(),
            ..CacheBlock::default()
        };
        Self {
            name,
            layout: AddressLayout::new(block_words, config.sets),
            ways: config.ways,
            blocks: vec![empty; config.sets * config.ways],
            policy: Box::new(LruPolicy::new(config.sets, config.ways)),
            mshr: mshr_entries.map(MshrTable::new),
            stats: CacheStats::default(),
        }
    }

    /// Level label.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Address split for this level.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// MSHR table, if this level has one.
    pub const fn mshr(&self) -> Option<&MshrTable> {
        self.mshr.as_ref()
    }

    /// Mutable MSHR table, if this level has one.
    pub fn mshr_mut(&mut self) -> Option<&mut MshrTable> {
        self.mshr.as_mut()
    }

    fn set_blocks(&self, set: usize) -> &[CacheBlock] {
        let base = set * self.ways;
        self.blocks.get(base..base + self.ways).unwrap_or(&[])
    }

    fn block_mut(&mut self, set: usize, way: usize) -> Option<&mut CacheBlock> {
        self.blocks.get_mut(set * self.ways + way)
    }

    /// Returns the block at `[set][way]`.
    pub fn block(&self, set: usize, way: usize) -> Option<&CacheBlock> {
        self.set_blocks(set).get(way)
    }

    /// Recency rank of `[set][way]` (0 = most recently used), or `None` outside the geometry.
    pub fn lru_rank(&self, set: usize, way: usize) -> Option<usize> {
        self.policy.rank(set, way)
    }

    /// Finds the way holding `addr` without touching replacement state.
    ///
    /// # Returns
    ///
    /// The way index on a hit, or `None` on a miss.
    pub fn probe(&self, addr: u32) -> Option<usize> {
        let tag = self.layout.tag(addr);
        self.set_blocks(self.layout.set(addr))
            .iter()
            .position(|b| b.valid && b.tag == tag)
    }

    /// Returns `true` if the block containing `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        self.probe(addr).is_some()
    }

    /// Reads the word at `addr` on a hit, updating LRU and the hit counter.
    ///
    /// A miss leaves all state, including the counters, untouched; primary misses
    /// are counted by the hierarchy when it opens a request.
    pub fn read_word(&mut self, addr: u32) -> Option<u32> {
        let way = self.probe(addr)?;
        let set = self.layout.set(addr);
        self.policy.update(set, way);
        self.stats.hits += 1;
        let offset = self.layout.offset(addr);
        self.block(set, way).map(|b| b.data[offset])
    }

    /// Writes the word at `addr` if resident, marking the block dirty.
    ///
    /// # Returns
    ///
    /// `true` if the block was resident and the write landed.
    pub fn write_word(&mut self, addr: u32, value: u32) -> bool {
        let Some(way) = self.probe(addr) else {
            return false;
        };
        let set = self.layout.set(addr);
        let offset = self.layout.offset(addr);
        self.policy.update(set, way);
        match self.block_mut(set, way) {
            Some(block) => {
                block.data[offset] = value;
                block.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Copies a whole resident block out, updating LRU.
    pub fn read_block(&mut self, addr: u32) -> Option<Box<[u32]>> {
        let way = self.probe(addr)?;
        let set = self.layout.set(addr);
        self.policy.update(set, way);
        self.block(set, way).map(|b| b.data.clone())
    }

    /// Overwrites a resident block with `data` (a writeback from the level above) and marks it dirty.
    ///
    /// # Returns
    ///
    /// `true` if the block was resident.
    pub fn absorb_writeback(&mut self, addr: u32, data: &[u32]) -> bool {
        let Some(way) = self.probe(addr) else {
            return false;
        };
        let set = self.layout.set(addr);
        match self.block_mut(set, way) {
            Some(block) => {
                block.data.copy_from_slice(data);
                block.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Picks the way a fill of `set` will occupy: the first invalid way, else the LRU way.
    pub fn victim(&self, set: usize) -> usize {
        self.set_blocks(set)
            .iter()
            .position(|b| !b.valid)
            .unwrap_or_else(|| self.policy.get_victim(set))
    }

    /// Installs the block containing `addr` with `data`, clean.
    ///
    /// # Arguments
    ///
    /// * `addr` - Any address inside the block.
    /// * `data` - The block contents (`block_words` words).
    ///
    /// # Returns
    ///
    /// The displaced block if it was valid and dirty; the caller writes it to the next level.
    pub fn install(&mut self, addr: u32, data: &[u32]) -> Option<Eviction> {
        if self.blocks.is_empty() {
            return None;
        }
        let set = self.layout.set(addr);
        let tag = self.layout.tag(addr);
        let way = self.victim(set);
        let layout = self.layout;
        let name = self.name;

        let block = self.block_mut(set, way)?;
        let evicted = (block.valid && block.dirty).then(|| Eviction {
            addr: layout.compose(block.tag, set),
            data: block.data.clone(),
        });
        block.valid = true;
        block.dirty = false;
        block.tag = tag;
        block.data.copy_from_slice(data);
        self.policy.update(set, way);

        if let Some(ev) = &evicted {
            self.stats.writebacks += 1;
            tracing::debug!(
                cache = name,
                victim = format_args!("{:#010x}", ev.addr),
                "dirty eviction"
            );
        }
        tracing::trace!(
            cache = name,
            addr = format_args!("{:#010x}", layout.block_base(addr)),
            set,
            way,
            "fill"
        );
        evicted
    }

    /// Number of valid ways in `set`.
    pub fn valid_in_set(&self, set: usize) -> usize {
        self.set_blocks(set).iter().filter(|b| b.valid).count()
    }

    /// Releases all block storage and outstanding-miss state.
    ///
    /// Subsequent lookups miss and fills are dropped.
    pub fn release(&mut self) {
        self.blocks = Vec::new();
        if let Some(mshr) = &mut self.mshr {
            mshr.clear();
        }
    }
}
