//! Flat Main Memory.
//!
//! A sparse, zero-initialised word store covering the whole 32-bit address space.
//! Only words that have been written occupy storage, so a program at the text
//! segment and a stack near the top of memory cost nothing in between.

use std::collections::HashMap;

use crate::common::constants::WORD_ALIGN_MASK;
use crate::soc::traits::MainMemory;

/// Sparse word-addressed memory.
#[derive(Clone, Debug, Default)]
pub struct FlatMemory {
    words: HashMap<u32, u32>,
}

impl FlatMemory {
    /// Creates an empty memory where every word reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words that have been written.
    pub fn resident_words(&self) -> usize {
        self.words.len()
    }
}

impl MainMemory for FlatMemory {
    fn read_word(&self, addr: u32) -> u32 {
        self.words.get(&(addr & WORD_ALIGN_MASK)).copied().unwrap_or(0)
    }

    fn write_word(&mut self, addr: u32, value: u32) {
        let _ = self.words.insert(addr & WORD_ALIGN_MASK, value);
    }
}
