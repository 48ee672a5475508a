//! ALU logical and comparison operations.
//!
//! Comparisons produce 1 or 0. `Slt` compares as signed 32-bit integers;
//! `Sltu` compares the raw bit patterns.

use crate::core::pipeline::signals::AluOp;

/// Executes a logical or comparison operation. Returns `0` for other opcodes.
pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Nor => !(a | b),
        AluOp::Slt => u32::from((a as i32) < (b as i32)),
        AluOp::Sltu => u32::from(a < b),
        _ => 0,
    }
}
