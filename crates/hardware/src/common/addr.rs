//! Cache Address Decomposition.
//!
//! Every cache level splits a 32-bit byte address into the same three fields:
//!
//! ```text
//! | tag | set index | block offset | byte-in-word |
//!        set_bits     block_shift    word_shift
//! ```
//!
//! The split is centralized here so the L1I, L1D and L2 geometries cannot drift
//! apart. All shift amounts are derived from the block size in words and the set
//! count, both of which must be powers of two (enforced by `Config::validate`).

use super::constants::WORD_SHIFT;

/// Tag/set/offset layout for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    word_shift: u32,
    block_shift: u32,
    set_bits: u32,
    num_sets: usize,
}

impl AddressLayout {
    /// Creates a layout for a cache with `block_words` words per block and `num_sets` sets.
    ///
    /// # Arguments
    ///
    /// * `block_words` - Block size in 32-bit words (power of two).
    /// * `num_sets` - Number of sets (power of two).
    pub fn new(block_words: usize, num_sets: usize) -> Self {
        Self {
            word_shift: WORD_SHIFT,
            block_shift: block_words.trailing_zeros(),
            set_bits: num_sets.trailing_zeros(),
            num_sets,
        }
    }

    /// Number of low address bits covered by one block (word + block offset bits).
    #[inline(always)]
    pub const fn line_shift(&self) -> u32 {
        self.word_shift + self.block_shift
    }

    /// Number of words in one block.
    #[inline(always)]
    pub const fn block_words(&self) -> usize {
        1 << self.block_shift
    }

    /// Number of sets this layout indexes.
    #[inline(always)]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Extracts the tag: `address >> (word_shift + block_shift + set_bits)`.
    #[inline(always)]
    pub fn tag(&self, address: u32) -> u32 {
        address
            .checked_shr(self.line_shift() + self.set_bits)
            .unwrap_or(0)
    }

    /// Extracts the set index: `(address >> (word_shift + block_shift)) & (num_sets - 1)`.
    #[inline(always)]
    pub fn set(&self, address: u32) -> usize {
        (address >> self.line_shift()) as usize & (self.num_sets - 1)
    }

    /// Extracts the word offset within the block: `(address >> word_shift) & (block_words - 1)`.
    #[inline(always)]
    pub fn offset(&self, address: u32) -> usize {
        (address >> self.word_shift) as usize & (self.block_words() - 1)
    }

    /// Clears the offset bits, yielding the address of the first word in the block.
    #[inline(always)]
    pub fn block_base(&self, address: u32) -> u32 {
        address & !((1u32 << self.line_shift()) - 1)
    }

    /// Rebuilds the block base address from a stored tag and its set index.
    ///
    /// Used to locate the write-back target of an evicted block.
    pub fn compose(&self, tag: u32, set: usize) -> u32 {
        let tag_part = tag
            .checked_shl(self.line_shift() + self.set_bits)
            .unwrap_or(0);
        tag_part | ((set as u32) << self.line_shift())
    }

    /// Address of word `index` within the block starting at `base`.
    #[inline(always)]
    pub const fn word_address(&self, base: u32, index: usize) -> u32 {
        base.wrapping_add((index as u32) << self.word_shift)
    }
}
