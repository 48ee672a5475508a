//! Main memory trait.
//!
//! This module defines the `MainMemory` trait the cache hierarchy uses to reach
//! backing storage. It provides:
//! 1. **Access:** Word read and write at byte addresses (aligned down to the word).
//! 2. **Block Transfer:** Default block read/write used by L2 fills and writebacks.
//!
//! Access timing is modelled entirely by the hierarchy's request state machine;
//! implementors are purely functional stores.

use crate::common::addr::AddressLayout;

/// Flat, word-addressed backing store behind the L2.
pub trait MainMemory {
    /// Reads the 32-bit word containing `addr`.
    fn read_word(&self, addr: u32) -> u32;

    /// Writes the 32-bit word containing `addr`.
    fn write_word(&mut self, addr: u32, value: u32);

    /// Fills `out` with the words of the block starting at `base`.
    ///
    /// # Arguments
    ///
    /// * `layout` - Geometry of the requesting cache; supplies the word stride.
    /// * `base` - Block-aligned start address.
    /// * `out` - Destination words; its length is the block size.
    fn read_block(&self, layout: &AddressLayout, base: u32, out: &mut [u32]) {
        for (i, word) in out.iter_mut().enumerate() {
            *word = self.read_word(layout.word_address(base, i));
        }
    }

    /// Writes `data` as the block starting at `base`.
    fn write_block(&mut self, layout: &AddressLayout, base: u32, data: &[u32]) {
        for (i, word) in data.iter().enumerate() {
            self.write_word(layout.word_address(base, i), *word);
        }
    }
}
