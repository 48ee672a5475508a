//! Execute Stage Tests.

use super::{PC, decoded};
use crate::common::builder::instruction::{self as asm, reg};
use crate::common::harness::engine;
use pipesim_core::config::Config;
use pipesim_core::core::pipeline::engine::{FlushDepth, Recovery};
use pipesim_core::core::pipeline::latches::PipeOp;
use pipesim_core::core::pipeline::signals::BranchCond;
use pipesim_core::core::pipeline::stages::decode::decode;
use pipesim_core::core::pipeline::stages::execute::branch_taken;
use pipesim_core::core::pipeline::stages::execute_stage;
use pipesim_core::core::pipeline::traits::PipelineLatch;
use pipesim_core::core::units::bru::Prediction;
use pipesim_core::PipelineEngine;
use rstest::rstest;

/// Runs one execute evaluation on `inst` and returns the op it produced.
fn execute_one(engine: &mut PipelineEngine, op: Box<PipeOp>) -> Box<PipeOp> {
    engine.execute_latch.put(op);
    execute_stage(engine);
    engine.mem_latch.take().expect("execute produced an op")
}

fn predicted_op(inst: u32, predicted: Prediction) -> Box<PipeOp> {
    let mut op = PipeOp::fetched(PC, inst, predicted);
    decode(&mut op);
    Box::new(op)
}

#[rstest]
#[case::eq_taken(BranchCond::Eq, 5, 5, true)]
#[case::eq_not_taken(BranchCond::Eq, 5, 6, false)]
#[case::ne(BranchCond::Ne, 5, 6, true)]
#[case::lez_zero(BranchCond::Lez, 0, 0, true)]
#[case::lez_negative(BranchCond::Lez, 0xFFFF_FFFF, 0, true)]
#[case::gtz_negative(BranchCond::Gtz, 0x8000_0000, 0, false)]
#[case::gtz_positive(BranchCond::Gtz, 1, 0, true)]
#[case::ltz(BranchCond::Ltz, 0x8000_0000, 0, true)]
#[case::gez_zero(BranchCond::Gez, 0, 0, true)]
#[case::gez_negative(BranchCond::Gez, 0xFFFF_FFFE, 0, false)]
#[case::always(BranchCond::Always, 1, 2, true)]
fn branch_conditions(#[case] cond: BranchCond, #[case] a: u32, #[case] b: u32, #[case] taken: bool) {
    assert_eq!(branch_taken(cond, a, b), taken);
}

#[test]
fn alu_result_is_ready_for_bypass() {
    let mut engine = engine();
    engine.regs.write(reg::T0 as usize, 5);
    engine.regs.write(reg::T1 as usize, 7);
    let op = execute_one(&mut engine, decoded(asm::addu(reg::T2, reg::T0, reg::T1)));
    assert_eq!((op.src1_value, op.src2_value), (5, 7));
    assert_eq!(op.dst_value, 12);
    assert!(op.dst_ready);
}

#[rstest]
#[case::ori_zero_extends(asm::ori(reg::T0, reg::ZERO, 0x8000), 0x8000)]
#[case::andi_zero_extends(asm::andi(reg::T0, reg::T1, 0xFFFF), 0xF0F0)]
#[case::addiu_sign_extends(asm::addiu(reg::T0, reg::ZERO, -1), 0xFFFF_FFFF)]
#[case::slti_sign_extends(asm::slti(reg::T0, reg::ZERO, -1), 0)]
#[case::lui(asm::lui(reg::T0, 0xABCD), 0xABCD_0000)]
#[case::sll(asm::sll(reg::T0, reg::T1, 4), 0xFF0F_0F00)]
#[case::sra(asm::sra(reg::T0, reg::T1, 4), 0xFFFF_0F0F)]
#[case::srlv(asm::srlv(reg::T0, reg::T1, reg::T2), 0x0FFF_0F0F)]
fn immediate_and_shift_operands(#[case] inst: u32, #[case] expected: u32) {
    let mut engine = engine();
    engine.regs.write(reg::T1 as usize, 0xFFF0_F0F0);
    engine.regs.write(reg::T2 as usize, 36);
    let op = execute_one(&mut engine, decoded(inst));
    assert_eq!(op.dst_value, expected);
}

#[test]
fn writeback_slot_is_bypassed() {
    let mut engine = engine();
    let mut producer = decoded(asm::addiu(reg::T0, reg::ZERO, 21));
    producer.dst_value = 21;
    producer.dst_ready = true;
    engine.wb_latch.put(producer);

    let op = execute_one(&mut engine, decoded(asm::addu(reg::T1, reg::T0, reg::T0)));
    assert_eq!(op.dst_value, 42);
    assert_eq!(engine.stats.stalls_data, 0);
}

#[test]
fn waits_while_memory_latch_is_occupied() {
    let mut engine = engine();
    engine.mem_latch.put(decoded(asm::nop()));
    engine.execute_latch.put(decoded(asm::addu(reg::T1, reg::T0, reg::T0)));
    execute_stage(&mut engine);
    assert!(!engine.execute_latch.is_empty());
}

#[test]
fn effective_address_and_store_value() {
    let mut engine = engine();
    engine.regs.write(reg::T1 as usize, 0x1000_0100);
    engine.regs.write(reg::T2 as usize, 0x55);

    let load = execute_one(&mut engine, decoded(asm::lw(reg::T0, -4, reg::T1)));
    assert_eq!(load.mem_addr, 0x1000_00FC);
    assert!(!load.dst_ready, "load value comes from the memory stage");

    let store = execute_one(&mut engine, decoded(asm::sb(reg::T2, 9, reg::T1)));
    assert_eq!(store.mem_addr, 0x1000_0109);
    assert_eq!(store.mem_value, 0x55);
}

#[test]
fn hilo_move_waits_for_multiply() {
    let mut engine = engine();
    let latency = Config::default().pipeline.multiply_latency;
    engine.regs.write(reg::T0 as usize, 6);
    engine.regs.write(reg::T1 as usize, 7);

    let _ = execute_one(&mut engine, decoded(asm::mult(reg::T0, reg::T1)));
    assert_eq!((engine.regs.hi, engine.regs.lo), (0, 42));
    assert!(engine.muldiv.is_busy());

    engine.execute_latch.put(decoded(asm::mflo(reg::S0)));
    let mut evaluations = 0;
    while engine.mem_latch.is_empty() {
        evaluations += 1;
        execute_stage(&mut engine);
    }
    assert_eq!(evaluations, latency);
    assert_eq!(engine.stats.stalls_muldiv, u64::from(latency - 1));
    assert_eq!(engine.mem_latch.peek().map(|op| op.dst_value), Some(42));
}

#[test]
fn multiply_does_not_wait_for_busy_unit() {
    let mut engine = engine();
    let _ = execute_one(&mut engine, decoded(asm::mult(reg::T0, reg::T1)));
    let _ = execute_one(&mut engine, decoded(asm::multu(reg::T0, reg::T1)));
    assert_eq!(engine.stats.stalls_muldiv, 0);
}

#[test]
fn mthi_writes_hi_directly() {
    let mut engine = engine();
    engine.regs.write(reg::S0 as usize, 0x77);
    let _ = execute_one(&mut engine, decoded(asm::mthi(reg::S0)));
    assert_eq!(engine.regs.hi, 0x77);
}

#[test]
fn unknown_branch_is_a_misprediction_even_when_not_taken() {
    let mut engine = engine();
    engine.regs.write(reg::T0 as usize, 1);
    let _ = execute_one(&mut engine, decoded(asm::beq(reg::T0, reg::ZERO, 4)));

    assert_eq!(
        engine.recovery,
        Some(Recovery {
            depth: FlushDepth::Execute,
            target: PC + 4,
        })
    );
    assert_eq!(engine.stats.branch_mispredictions, 1);
    assert_eq!(engine.stats.conditional_branches, 1);
}

#[test]
fn correctly_predicted_branch_does_not_recover() {
    let mut engine = engine();
    let dest = PC + 4 + 8;
    let predicted = Prediction {
        is_branch: true,
        taken: true,
        next_pc: dest,
    };
    let op = execute_one(&mut engine, predicted_op(asm::beq(reg::ZERO, reg::ZERO, 2), predicted));

    assert!(op.branch_taken);
    assert_eq!(op.branch_dest, dest);
    assert_eq!(engine.recovery, None);
    assert_eq!(engine.stats.branch_mispredictions, 0);
}

#[test]
fn wrong_target_redirects_to_register_value() {
    let mut engine = engine();
    engine.regs.write(reg::RA as usize, 0x0040_0800);
    let predicted = Prediction {
        is_branch: true,
        taken: true,
        next_pc: 0x0040_0400,
    };
    let _ = execute_one(&mut engine, predicted_op(asm::jr(reg::RA), predicted));

    assert_eq!(engine.recovery.map(|r| r.target), Some(0x0040_0800));
    assert_eq!(engine.stats.unconditional_branches, 1);

    let entry = engine.predictor.btb().lookup(PC).expect("jump recorded");
    assert_eq!(entry.target, 0x0040_0800);
    assert!(entry.is_unconditional);
}

#[test]
fn conditional_branch_trains_direction() {
    let mut engine = engine();
    let idx = engine.predictor.pattern_index(PC);
    let before = engine.predictor.counter(idx);

    let _ = execute_one(&mut engine, decoded(asm::beq(reg::ZERO, reg::ZERO, 2)));

    assert_eq!(engine.predictor.counter(idx), before + 1);
    assert_eq!(engine.predictor.history() & 1, 1);
    let entry = engine.predictor.btb().lookup(PC).expect("branch recorded");
    assert_eq!(entry.target, PC + 12);
    assert!(!entry.is_unconditional);
}

#[test]
fn not_taken_branch_still_records_taken_path() {
    let mut engine = engine();
    engine.regs.write(reg::T0 as usize, 3);
    let op = execute_one(&mut engine, decoded(asm::bltz(reg::T0, 5)));
    assert!(!op.branch_taken);
    assert_eq!(engine.predictor.btb().lookup(PC).map(|e| e.target), Some(PC + 24));
}
