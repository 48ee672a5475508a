//! Execute (EX) Stage.
//!
//! This module implements the third stage of the pipeline. It performs the following:
//! 1. **Operand Resolution:** Reads sources through the bypass network, stalling on a
//!    load whose value the memory stage has not produced yet.
//! 2. **Computation:** ALU results, effective addresses, and multiply/divide into HI/LO.
//! 3. **Branch Resolution:** Evaluates conditions and destinations, trains the predictor,
//!    and schedules a recovery when fetch followed the wrong path.
//!
//! The multiply/divide countdown is decremented on every evaluation, including ones
//! that end in a stall.

use crate::core::pipeline::engine::{FlushDepth, PipelineEngine};
use crate::core::pipeline::hazards::{Operand, resolve_operand};
use crate::core::pipeline::latches::PipeOp;
use crate::core::pipeline::signals::{AluOp, AluOperands, BranchCond, BranchTarget, MulDivOp, OpClass};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::alu::Alu;
use crate::core::units::bru::BranchPredictor;

/// Executes the execute stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline state
pub fn execute_stage(engine: &mut PipelineEngine) {
    engine.muldiv.tick();

    if !engine.mem_latch.is_empty() {
        return;
    }
    let Some(mut op) = engine.execute_latch.take() else {
        return;
    };

    let mem_op = engine.mem_latch.peek();
    let wb_op = engine.wb_latch.peek();
    let operands = (
        resolve_operand(op.src1, mem_op, wb_op, &engine.regs),
        resolve_operand(op.src2, mem_op, wb_op, &engine.regs),
    );
    let (Operand::Ready(v1), Operand::Ready(v2)) = operands else {
        engine.stats.stalls_data += 1;
        engine.execute_latch.put(op);
        return;
    };
    op.src1_value = v1;
    op.src2_value = v2;

    match op.class {
        OpClass::Alu(alu, operands) => {
            let (a, b) = alu_inputs(&op, alu, operands);
            op.dst_value = Alu::execute(alu, a, b);
            op.dst_ready = true;
        }

        OpClass::MulDiv(kind) => {
            if is_hilo_move(kind) && engine.muldiv.is_busy() {
                engine.stats.stalls_muldiv += 1;
                engine.execute_latch.put(op);
                return;
            }
            execute_muldiv(engine, &mut op, kind);
        }

        OpClass::Branch(cond, target) => resolve_branch(engine, &mut op, cond, target),

        OpClass::Mem(access) => {
            op.mem_addr = v1.wrapping_add(op.se_imm16);
            if access.write {
                op.mem_value = v2;
            }
        }

        OpClass::Syscall | OpClass::Nop => {}
    }

    tracing::trace!(
        pc = format_args!("{:#010x}", op.pc),
        dst = ?op.dst,
        value = format_args!("{:#010x}", op.dst_value),
        "EX"
    );
    engine.mem_latch.put(op);
}

/// Selects the two ALU inputs.
///
/// AND/OR/XOR/LUI immediates are zero-extended, every other immediate is sign-extended.
fn alu_inputs(op: &PipeOp, alu: AluOp, operands: AluOperands) -> (u32, u32) {
    match operands {
        AluOperands::RegReg => (op.src1_value, op.src2_value),
        AluOperands::RegImm => {
            let imm = match alu {
                AluOp::And | AluOp::Or | AluOp::Xor | AluOp::Lui => op.imm16,
                _ => op.se_imm16,
            };
            (op.src1_value, imm)
        }
        AluOperands::ShiftImm => (op.src2_value, op.shamt),
        AluOperands::ShiftReg => (op.src2_value, op.src1_value),
    }
}

const fn is_hilo_move(kind: MulDivOp) -> bool {
    matches!(
        kind,
        MulDivOp::Mfhi | MulDivOp::Mflo | MulDivOp::Mthi | MulDivOp::Mtlo
    )
}

fn execute_muldiv(engine: &mut PipelineEngine, op: &mut PipeOp, kind: MulDivOp) {
    let (a, b) = (op.src1_value, op.src2_value);
    let regs = &mut engine.regs;
    match kind {
        MulDivOp::Mult | MulDivOp::Multu => {
            (regs.hi, regs.lo) = engine.muldiv.multiply(a, b, kind == MulDivOp::Mult);
        }
        MulDivOp::Div | MulDivOp::Divu => {
            (regs.hi, regs.lo) = engine.muldiv.divide(a, b, kind == MulDivOp::Div);
        }
        MulDivOp::Mfhi => {
            op.dst_value = regs.hi;
            op.dst_ready = true;
        }
        MulDivOp::Mflo => {
            op.dst_value = regs.lo;
            op.dst_ready = true;
        }
        MulDivOp::Mthi => regs.hi = a,
        MulDivOp::Mtlo => regs.lo = a,
    }
}

/// Evaluates a branch condition on the resolved operands.
///
/// # Arguments
///
/// * `cond` - The branch condition.
/// * `a` - Value of `rs`.
/// * `b` - Value of `rt` (only used by `Eq` and `Ne`).
pub const fn branch_taken(cond: BranchCond, a: u32, b: u32) -> bool {
    let signed = a as i32;
    match cond {
        BranchCond::Always => true,
        BranchCond::Eq => a == b,
        BranchCond::Ne => a != b,
        BranchCond::Lez => signed <= 0,
        BranchCond::Gtz => signed > 0,
        BranchCond::Ltz => signed < 0,
        BranchCond::Gez => signed >= 0,
    }
}

fn resolve_branch(engine: &mut PipelineEngine, op: &mut PipeOp, cond: BranchCond, target: BranchTarget) {
    let taken = branch_taken(cond, op.src1_value, op.src2_value);
    let dest = match target {
        BranchTarget::Static(dest) => dest,
        BranchTarget::Register => op.src1_value,
    };
    op.branch_taken = taken;
    op.branch_dest = dest;

    let predicted = op.predicted;
    let mispredicted = !predicted.is_branch
        || predicted.taken != taken
        || (taken && predicted.next_pc != dest);

    if mispredicted {
        let resume = if taken {
            dest
        } else {
            PipelineEngine::next_sequential(op.pc)
        };
        tracing::debug!(
            pc = format_args!("{:#010x}", op.pc),
            taken,
            predicted = format_args!("{:#010x}", predicted.next_pc),
            resume = format_args!("{resume:#010x}"),
            "branch mispredicted"
        );
        engine.recover(FlushDepth::Execute, resume);
        engine.stats.branch_mispredictions += 1;
    }

    if op.branch_cond {
        engine.predictor.update_direction(op.pc, taken);
        engine.stats.conditional_branches += 1;
    } else {
        engine.stats.unconditional_branches += 1;
    }
    engine.predictor.update_target(op.pc, dest, !op.branch_cond);
}
