//! Address Decomposition Tests.
//!
//! Checks the tag/set/offset split for each default cache geometry and that
//! `compose` inverts it.

use pipesim_core::common::AddressLayout;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::l1i(64, 5, 6)]
#[case::l1d(256, 5, 8)]
#[case::l2(512, 5, 9)]
fn shifts_follow_geometry(#[case] sets: usize, #[case] line_shift: u32, #[case] set_bits: u32) {
    let layout = AddressLayout::new(8, sets);
    assert_eq!(layout.line_shift(), line_shift);
    assert_eq!(layout.block_words(), 8);

    let addr = 0xDEAD_BEEF_u32;
    assert_eq!(layout.tag(addr), addr >> (line_shift + set_bits));
    assert_eq!(layout.set(addr), (addr >> line_shift) as usize & (sets - 1));
    assert_eq!(layout.offset(addr), (addr >> 2) as usize & 7);
}

#[test]
fn block_base_clears_offset_bits() {
    let layout = AddressLayout::new(8, 64);
    assert_eq!(layout.block_base(0x0040_001C), 0x0040_0000);
    assert_eq!(layout.block_base(0x0040_0020), 0x0040_0020);
}

#[test]
fn word_address_steps_by_word() {
    let layout = AddressLayout::new(8, 64);
    assert_eq!(layout.word_address(0x1000, 0), 0x1000);
    assert_eq!(layout.word_address(0x1000, 7), 0x101C);
}

#[test]
fn single_set_has_no_index_bits() {
    let layout = AddressLayout::new(4, 1);
    assert_eq!(layout.set(0xFFFF_FFFF), 0);
    assert_eq!(layout.tag(0x0000_0040), 0x4);
}

proptest! {
    #[test]
    fn compose_inverts_split(addr in any::<u32>(), sets_log2 in 0u32..10, words_log2 in 0u32..5) {
        let layout = AddressLayout::new(1 << words_log2, 1 << sets_log2);
        let rebuilt = layout.compose(layout.tag(addr), layout.set(addr));
        prop_assert_eq!(rebuilt, layout.block_base(addr));
    }
}
