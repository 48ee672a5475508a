//! End-of-Cycle Control Tests.
//!
//! Recovery requests from a stage take effect after every stage has run: fetch is
//! redirected and the younger latches are emptied according to the flush depth.

use super::{PC, decoded, decoded_at};
use crate::common::builder::instruction as asm;
use crate::common::harness::engine;
use crate::common::mocks::memory::CountingMemory;
use pipesim_core::core::pipeline::engine::{FlushDepth, Recovery};
use pipesim_core::core::pipeline::traits::PipelineLatch;
use pipesim_core::core::units::cache::hierarchy::CacheKind;
use pipesim_core::PipelineEngine;
use rstest::rstest;

fn fill_latches(engine: &mut PipelineEngine) {
    engine.decode_latch.put(decoded_at(PC + 12, asm::nop()));
    engine.execute_latch.put(decoded_at(PC + 8, asm::nop()));
    engine.mem_latch.put(decoded_at(PC + 4, asm::nop()));
    engine.wb_latch.put(decoded_at(PC, asm::nop()));
}

#[test]
fn first_recovery_in_a_cycle_wins() {
    let mut engine = engine();
    engine.recover(FlushDepth::Execute, 0x100);
    engine.recover(FlushDepth::Writeback, 0x200);
    assert_eq!(
        engine.recovery,
        Some(Recovery {
            depth: FlushDepth::Execute,
            target: 0x100,
        })
    );
}

#[test]
fn recovery_is_ignored_after_halt() {
    let mut engine = engine();
    engine.running = false;
    engine.recover(FlushDepth::Execute, 0x100);
    assert_eq!(engine.recovery, None);
}

#[test]
fn flush_depths_are_nested() {
    assert!(FlushDepth::Decode < FlushDepth::Execute);
    assert!(FlushDepth::Execute < FlushDepth::Memory);
    assert!(FlushDepth::Memory < FlushDepth::Writeback);
}

#[rstest]
#[case::decode(FlushDepth::Decode, [false, false, false])]
#[case::execute(FlushDepth::Execute, [true, false, false])]
#[case::memory(FlushDepth::Memory, [true, true, false])]
#[case::writeback(FlushDepth::Writeback, [true, true, true])]
fn depth_selects_flushed_latches(#[case] depth: FlushDepth, #[case] empty: [bool; 3]) {
    let mut engine = engine();
    let mut mem = CountingMemory::new();
    fill_latches(&mut engine);
    engine.recover(depth, 0x0040_0800);

    engine.cycle(&mut mem).expect("cycle");

    assert!(engine.decode_latch.is_empty());
    assert_eq!(
        [
            engine.execute_latch.is_empty(),
            engine.mem_latch.is_empty(),
            engine.wb_latch.is_empty(),
        ],
        empty
    );
    assert_eq!(engine.pc, 0x0040_0800);
    assert_eq!(engine.stats.squashes, 1);
    assert_eq!(engine.stats.instructions_retired, 1);
}

#[test]
fn misprediction_redirects_fetch_and_abandons_its_miss() {
    let mut engine = engine();
    let mut mem = CountingMemory::new();
    // beq $zero, $zero is always taken; fetch predicted fall-through.
    engine.execute_latch.put(decoded(asm::beq(0, 0, 3)));
    engine.decode_latch.put(decoded_at(PC + 4, asm::nop()));

    engine.cycle(&mut mem).expect("cycle");

    assert_eq!(engine.pc, PC + 16);
    assert!(engine.decode_latch.is_empty());
    assert!(engine.execute_latch.is_empty());
    assert!(engine.mem_latch.peek().is_some_and(|op| op.pc == PC));
    assert_eq!(engine.stats.squashes, 1);
    assert_eq!(engine.stats.stalls_fetch, 1);
    assert_eq!(engine.memory.queue(CacheKind::Instruction).waiting_on(), None);
    assert_eq!(engine.memory.queue(CacheKind::Instruction).outstanding(), 1);
}

#[test]
fn recovery_to_current_pc_keeps_the_fetch_wait() {
    let mut engine = engine();
    let mut mem = CountingMemory::new();
    let pc = engine.pc;
    engine.recover(FlushDepth::Decode, pc);

    engine.cycle(&mut mem).expect("cycle");

    assert!(engine.memory.queue(CacheKind::Instruction).waiting_on().is_some());
}

#[test]
fn halt_cancels_a_younger_recovery() {
    let mut engine = engine();
    let mut mem = CountingMemory::new();
    let halt_pc = PC + 0x40;
    let mut syscall = decoded_at(halt_pc, asm::syscall());
    syscall.src1_value = 10;
    engine.wb_latch.put(syscall);
    engine.execute_latch.put(decoded(asm::beq(0, 0, 3)));

    engine.cycle(&mut mem).expect("cycle");

    assert!(!engine.is_running());
    assert_eq!(engine.recovery, None);
    assert_eq!(engine.stats.squashes, 0);
    assert_eq!(engine.pc, halt_pc + 4);
    assert!(engine.mem_latch.is_empty(), "teardown empties every latch");
    assert_eq!(engine.stats.instructions_retired, 1);

    engine.cycle(&mut mem).expect("halted cycle");
    assert_eq!(engine.stats.cycles, 1);
}

#[test]
fn stop_is_idempotent() {
    let mut engine = engine();
    fill_latches(&mut engine);
    engine.stop();
    engine.stop();
    assert!(!engine.is_running());
    assert!(engine.wb_latch.is_empty());
    assert!(!engine.memory.l1i().contains(engine.pc));
}
