//! Instruction Field Extraction Tests.

use crate::common::builder::instruction::{self as asm, reg};
use pipesim_core::isa::instruction::InstructionBits;
use pipesim_core::isa::mips32::{funct, opcodes};
use rstest::rstest;

#[test]
fn r_type_fields() {
    let inst = asm::r_type(funct::SRA, 0, reg::T1, reg::T2, 7);
    assert_eq!(inst.opcode(), opcodes::OP_SPECIAL);
    assert_eq!(inst.rt(), reg::T1 as usize);
    assert_eq!(inst.rd(), reg::T2 as usize);
    assert_eq!(inst.shamt(), 7);
    assert_eq!(inst.funct(), funct::SRA);
}

#[rstest]
#[case(0x7FFF, 0x0000_7FFF)]
#[case(-1, 0xFFFF_FFFF)]
#[case(-32768, 0xFFFF_8000)]
#[case(0, 0)]
fn immediate_sign_extension(#[case] imm: i32, #[case] extended: u32) {
    let inst = asm::addiu(reg::T0, reg::T0, imm);
    assert_eq!(inst.imm16(), imm as u32 & 0xFFFF);
    assert_eq!(inst.se_imm16(), extended);
}

#[test]
fn jump_target_is_byte_offset() {
    let inst = asm::jal(0x0040_0100);
    assert_eq!(inst.opcode(), opcodes::OP_JAL);
    assert_eq!(inst.jump_target(), 0x0040_0100);
}

#[test]
fn register_fields_are_usize_indices() {
    let inst = asm::lw(reg::RA, 8, reg::S1);
    assert_eq!(inst.rs(), 17);
    assert_eq!(inst.rt(), 31);
}
