//! ALU Tests.

use pipesim_core::core::pipeline::signals::AluOp;
use pipesim_core::core::units::alu::Alu;
use rstest::rstest;

#[rstest]
#[case::add_wraps(AluOp::Add, 0x7FFF_FFFF, 1, 0x8000_0000)]
#[case::sub_wraps(AluOp::Sub, 0, 1, 0xFFFF_FFFF)]
#[case::and(AluOp::And, 0xF0F0, 0xFF00, 0xF000)]
#[case::or(AluOp::Or, 0xF0F0, 0x0F0F, 0xFFFF)]
#[case::xor(AluOp::Xor, 0xFFFF, 0x0F0F, 0xF0F0)]
#[case::nor(AluOp::Nor, 0, 0, 0xFFFF_FFFF)]
#[case::slt_signed(AluOp::Slt, 0xFFFF_FFFF, 0, 1)]
#[case::sltu_unsigned(AluOp::Sltu, 0xFFFF_FFFF, 0, 0)]
#[case::sll(AluOp::Sll, 1, 31, 0x8000_0000)]
#[case::srl(AluOp::Srl, 0x8000_0000, 31, 1)]
#[case::sra(AluOp::Sra, 0x8000_0000, 31, 0xFFFF_FFFF)]
#[case::shift_amount_masked(AluOp::Sll, 1, 33, 2)]
#[case::lui(AluOp::Lui, 0xDEAD, 0xBEEF, 0xBEEF_0000)]
fn alu_ops(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    assert_eq!(Alu::execute(op, a, b), expected);
}
