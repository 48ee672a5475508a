//! Instruction Decode Tests.

use super::{PC, decoded};
use crate::common::builder::instruction::{self as asm, reg};
use pipesim_core::core::pipeline::signals::{
    AluOp, AluOperands, BranchCond, BranchTarget, MemAccess, MemWidth, MulDivOp, OpClass,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const fn r(idx: u32) -> Option<usize> {
    Some(idx as usize)
}

#[rstest]
#[case::addu(asm::addu(reg::T2, reg::T0, reg::T1), OpClass::Alu(AluOp::Add, AluOperands::RegReg), r(reg::T0), r(reg::T1), r(reg::T2))]
#[case::slt(asm::slt(reg::T2, reg::T0, reg::T1), OpClass::Alu(AluOp::Slt, AluOperands::RegReg), r(reg::T0), r(reg::T1), r(reg::T2))]
#[case::sll(asm::sll(reg::T0, reg::T1, 4), OpClass::Alu(AluOp::Sll, AluOperands::ShiftImm), None, r(reg::T1), r(reg::T0))]
#[case::srlv(asm::srlv(reg::T0, reg::T1, reg::T2), OpClass::Alu(AluOp::Srl, AluOperands::ShiftReg), r(reg::T2), r(reg::T1), r(reg::T0))]
#[case::addiu(asm::addiu(reg::T0, reg::T1, -3), OpClass::Alu(AluOp::Add, AluOperands::RegImm), r(reg::T1), None, r(reg::T0))]
#[case::ori(asm::ori(reg::T0, reg::T1, 0xFF), OpClass::Alu(AluOp::Or, AluOperands::RegImm), r(reg::T1), None, r(reg::T0))]
#[case::lui(asm::lui(reg::T0, 0x1234), OpClass::Alu(AluOp::Lui, AluOperands::RegImm), None, None, r(reg::T0))]
#[case::mult(asm::mult(reg::T0, reg::T1), OpClass::MulDiv(MulDivOp::Mult), r(reg::T0), r(reg::T1), None)]
#[case::div(asm::div(reg::T0, reg::T1), OpClass::MulDiv(MulDivOp::Div), r(reg::T0), r(reg::T1), None)]
#[case::mfhi(asm::mfhi(reg::S0), OpClass::MulDiv(MulDivOp::Mfhi), None, None, r(reg::S0))]
#[case::mthi(asm::mthi(reg::S0), OpClass::MulDiv(MulDivOp::Mthi), r(reg::S0), None, None)]
#[case::syscall(asm::syscall(), OpClass::Syscall, r(reg::V0), r(reg::V1), None)]
#[case::nop(asm::nop(), OpClass::Alu(AluOp::Sll, AluOperands::ShiftImm), None, r(reg::ZERO), r(reg::ZERO))]
fn classifies_operands(
    #[case] inst: u32,
    #[case] class: OpClass,
    #[case] src1: Option<usize>,
    #[case] src2: Option<usize>,
    #[case] dst: Option<usize>,
) {
    let op = decoded(inst);
    assert_eq!(op.class, class);
    assert_eq!((op.src1, op.src2, op.dst), (src1, src2, dst));
    assert!(!op.is_branch);
}

#[rstest]
#[case::lw(asm::lw(reg::T0, 8, reg::T1), MemWidth::Word, false)]
#[case::lb(asm::lb(reg::T0, 8, reg::T1), MemWidth::Byte, true)]
#[case::lbu(asm::lbu(reg::T0, 8, reg::T1), MemWidth::Byte, false)]
#[case::lh(asm::lh(reg::T0, 8, reg::T1), MemWidth::Half, true)]
#[case::lhu(asm::lhu(reg::T0, 8, reg::T1), MemWidth::Half, false)]
fn loads_write_rt(#[case] inst: u32, #[case] width: MemWidth, #[case] signed: bool) {
    let op = decoded(inst);
    assert_eq!(op.class, OpClass::Mem(MemAccess { width, signed, write: false }));
    assert_eq!(op.src1, r(reg::T1));
    assert_eq!(op.src2, None);
    assert_eq!(op.dst, r(reg::T0));
    assert!(op.is_mem());
    assert!(!op.is_store());
}

#[rstest]
#[case::sw(asm::sw(reg::T0, -4, reg::T1), MemWidth::Word)]
#[case::sh(asm::sh(reg::T0, -4, reg::T1), MemWidth::Half)]
#[case::sb(asm::sb(reg::T0, -4, reg::T1), MemWidth::Byte)]
fn stores_read_both_registers(#[case] inst: u32, #[case] width: MemWidth) {
    let op = decoded(inst);
    assert_eq!(op.class, OpClass::Mem(MemAccess { width, signed: false, write: true }));
    assert_eq!((op.src1, op.src2, op.dst), (r(reg::T1), r(reg::T0), None));
    assert_eq!(op.se_imm16, (-4i32) as u32);
    assert!(op.is_store());
}

#[test]
fn immediates_are_extracted_both_ways() {
    let op = decoded(asm::addiu(reg::T0, reg::T0, -1));
    assert_eq!(op.imm16, 0xFFFF);
    assert_eq!(op.se_imm16, 0xFFFF_FFFF);

    let op = decoded(asm::ori(reg::T0, reg::T0, 0x7FFF));
    assert_eq!(op.se_imm16, 0x7FFF);
}

#[rstest]
#[case::forward(3, PC + 4 + 12)]
#[case::backward(-1, PC)]
#[case::fallthrough(0, PC + 4)]
fn relative_branch_destination(#[case] offset: i32, #[case] dest: u32) {
    let op = decoded(asm::beq(reg::T0, reg::T1, offset));
    assert_eq!(op.class, OpClass::Branch(BranchCond::Eq, BranchTarget::Static(dest)));
    assert!(op.is_branch);
    assert!(op.branch_cond);
    assert_eq!((op.src1, op.src2, op.dst), (r(reg::T0), r(reg::T1), None));
}

#[rstest]
#[case::bne(asm::bne(reg::T0, reg::T1, 1), BranchCond::Ne)]
#[case::blez(asm::blez(reg::T0, 1), BranchCond::Lez)]
#[case::bltz(asm::bltz(reg::T0, 1), BranchCond::Ltz)]
fn conditional_kinds(#[case] inst: u32, #[case] cond: BranchCond) {
    let op = decoded(inst);
    assert_eq!(op.class, OpClass::Branch(cond, BranchTarget::Static(PC + 8)));
    assert!(op.branch_cond);
    assert_eq!(op.dst, None);
}

#[test]
fn bgezal_links_ra_at_decode() {
    let op = decoded(asm::bgezal(reg::T0, 2));
    assert_eq!(op.class, OpClass::Branch(BranchCond::Gez, BranchTarget::Static(PC + 12)));
    assert_eq!(op.src1, r(reg::T0));
    assert_eq!(op.dst, r(reg::RA));
    assert_eq!(op.dst_value, PC + 4);
    assert!(op.dst_ready);
}

#[test]
fn jumps_are_unconditional() {
    let j = decoded(asm::j(0x0040_0800));
    assert_eq!(j.class, OpClass::Branch(BranchCond::Always, BranchTarget::Static(0x0040_0800)));
    assert!(j.is_branch);
    assert!(!j.branch_cond);
    assert_eq!(j.dst, None);

    let jal = decoded(asm::jal(0x0040_0800));
    assert_eq!(jal.dst, r(reg::RA));
    assert_eq!(jal.dst_value, PC + 4);
    assert!(jal.dst_ready);
}

#[test]
fn jump_keeps_the_pc_region() {
    let op = super::decoded_at(0x8000_0000, asm::j(0x0000_0040));
    assert_eq!(op.class, OpClass::Branch(BranchCond::Always, BranchTarget::Static(0x8000_0040)));
}

#[test]
fn register_jumps() {
    let jr = decoded(asm::jr(reg::RA));
    assert_eq!(jr.class, OpClass::Branch(BranchCond::Always, BranchTarget::Register));
    assert_eq!((jr.src1, jr.dst), (r(reg::RA), None));

    let jalr = decoded(asm::jalr(reg::S1, reg::T0));
    assert_eq!(jalr.src1, r(reg::T0));
    assert_eq!(jalr.dst, r(reg::S1));
    assert_eq!(jalr.dst_value, PC + 4);
}

#[test]
fn unknown_opcode_flows_as_nop() {
    let op = decoded(0xFC00_0000);
    assert_eq!(op.class, OpClass::Nop);
    assert_eq!((op.src1, op.src2, op.dst), (None, None, None));
}

#[test]
fn decode_stage_waits_for_execute_latch() {
    use pipesim_core::core::pipeline::stages::decode_stage;
    use pipesim_core::core::pipeline::traits::PipelineLatch;

    let mut engine = crate::common::harness::engine();
    engine.decode_latch.put(decoded(asm::nop()));
    engine.execute_latch.put(decoded(asm::nop()));
    decode_stage(&mut engine);
    assert!(!engine.decode_latch.is_empty());

    let _ = engine.execute_latch.take();
    decode_stage(&mut engine);
    assert!(engine.decode_latch.is_empty());
    assert!(!engine.execute_latch.is_empty());
}
