//! Memory Stage Tests.
//!
//! Sub-word lanes are little-endian: byte 0 of a word is bits 7-0.

use super::decoded;
use crate::common::builder::instruction::{self as asm, reg};
use crate::common::harness::engine;
use crate::common::mocks::memory::CountingMemory;
use pipesim_core::core::pipeline::signals::{MemAccess, MemWidth};
use pipesim_core::core::pipeline::stages::memory::{extract_load, merge_store};
use pipesim_core::core::pipeline::stages::mem_stage;
use pipesim_core::core::pipeline::traits::PipelineLatch;
use proptest::prelude::*;
use rstest::rstest;

const WORD: u32 = 0x8765_43A1;

const fn load(width: MemWidth, signed: bool) -> MemAccess {
    MemAccess {
        width,
        signed,
        write: false,
    }
}

#[rstest]
#[case::lbu_0(0, load(MemWidth::Byte, false), 0xA1)]
#[case::lb_0(0, load(MemWidth::Byte, true), 0xFFFF_FFA1)]
#[case::lbu_1(1, load(MemWidth::Byte, false), 0x43)]
#[case::lb_1(1, load(MemWidth::Byte, true), 0x43)]
#[case::lbu_3(3, load(MemWidth::Byte, false), 0x87)]
#[case::lb_3(3, load(MemWidth::Byte, true), 0xFFFF_FF87)]
#[case::lhu_0(0, load(MemWidth::Half, false), 0x43A1)]
#[case::lh_0(0, load(MemWidth::Half, true), 0x43A1)]
#[case::lhu_2(2, load(MemWidth::Half, false), 0x8765)]
#[case::lh_2(2, load(MemWidth::Half, true), 0xFFFF_8765)]
#[case::lw(0, load(MemWidth::Word, false), WORD)]
fn extracts_lanes(#[case] offset: u32, #[case] access: MemAccess, #[case] expected: u32) {
    assert_eq!(extract_load(WORD, 0x1000 + offset, access), expected);
}

#[rstest]
#[case::sb_0(0, MemWidth::Byte, 0x8765_43FF)]
#[case::sb_2(2, MemWidth::Byte, 0x87FF_43A1)]
#[case::sh_0(0, MemWidth::Half, 0x8765_EEFF)]
#[case::sh_2(2, MemWidth::Half, 0xEEFF_43A1)]
#[case::sw(0, MemWidth::Word, 0xCCDD_EEFF)]
fn merges_lanes(#[case] offset: u32, #[case] width: MemWidth, #[case] expected: u32) {
    assert_eq!(merge_store(WORD, 0x1000 + offset, 0xCCDD_EEFF, width), expected);
}

proptest! {
    #[test]
    fn merged_lane_reads_back(word in any::<u32>(), value in any::<u32>(), offset in 0u32..4, half in any::<bool>()) {
        let (width, offset) = if half { (MemWidth::Half, offset & 2) } else { (MemWidth::Byte, offset) };
        let mask = if half { 0xFFFF } else { 0xFF };
        let merged = merge_store(word, offset, value, width);

        prop_assert_eq!(extract_load(merged, offset, load(width, false)), value & mask);

        let shift = offset * 8;
        let untouched = !(mask << shift);
        prop_assert_eq!(merged & untouched, word & untouched);
    }
}

#[test]
fn non_memory_op_passes_through() {
    let mut engine = engine();
    engine.mem_latch.put(decoded(asm::addu(reg::T0, reg::T1, reg::T2)));
    mem_stage(&mut engine).expect("no store");
    assert!(engine.mem_latch.is_empty());
    assert!(!engine.wb_latch.is_empty());
    assert_eq!(engine.stats.stalls_mem, 0);
}

#[test]
fn waits_for_writeback_latch() {
    let mut engine = engine();
    engine.mem_latch.put(decoded(asm::nop()));
    engine.wb_latch.put(decoded(asm::nop()));
    mem_stage(&mut engine).expect("no store");
    assert!(!engine.mem_latch.is_empty());
}

#[test]
fn load_miss_holds_the_op_until_the_block_arrives() {
    let mut engine = engine();
    let mut mem = CountingMemory::new();
    mem.preload(0x1000_0020, 0x0000_BEEF);

    let mut op = decoded(asm::lhu(reg::T0, 0, reg::T1));
    op.mem_addr = 0x1000_0020;
    engine.mem_latch.put(op);

    let mut cycles = 0;
    while engine.wb_latch.is_empty() {
        cycles += 1;
        assert!(cycles < 1_000, "load never completed");
        engine.memory.tick(&mut mem);
        mem_stage(&mut engine).expect("loads cannot fail");
    }

    assert_eq!(engine.stats.stalls_mem, 60);
    let retired = engine.wb_latch.peek().expect("moved to writeback");
    assert_eq!(retired.dst_value, 0xBEEF);
    assert!(retired.dst_ready);
}

#[test]
fn store_merges_into_resident_word() {
    let mut engine = engine();
    let mut mem = CountingMemory::new();
    mem.preload(0x1000_0040, 0x1122_3344);

    let mut op = decoded(asm::sb(reg::T0, 0, reg::T1));
    op.mem_addr = 0x1000_0041;
    op.mem_value = 0xABCD_EF99;
    engine.mem_latch.put(op);
    while engine.wb_latch.is_empty() {
        engine.memory.tick(&mut mem);
        mem_stage(&mut engine).expect("store to a filled block");
    }

    let mut check = decoded(asm::lw(reg::T2, 0, reg::T1));
    check.mem_addr = 0x1000_0040;
    let _ = engine.wb_latch.take();
    engine.mem_latch.put(check);
    mem_stage(&mut engine).expect("hit");
    assert_eq!(engine.wb_latch.peek().map(|op| op.dst_value), Some(0x1122_9944));
    assert_eq!(mem.writes(), 0, "write-back cache holds the store");
}
