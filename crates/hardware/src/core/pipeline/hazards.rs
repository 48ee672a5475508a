//! Data Hazard Detection and Forwarding.
//!
//! This module resolves source operands for the execute stage. It provides:
//! 1. **Hazard Detection:** A load in the memory slot whose value is not yet ready stalls execute.
//! 2. **Operand Forwarding:** Values from the memory and writeback slots bypass the register file.
//!
//! Priority is youngest-producer first: the memory slot, then the writeback slot,
//! then the register file.

use crate::common::reg::RegisterFile;
use crate::core::pipeline::latches::PipeOp;

/// Outcome of resolving one source operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// The value is available.
    Ready(u32),
    /// The producer has not computed the value yet; execute must wait.
    Stall,
}

/// Resolves a source register for the instruction in execute.
///
/// # Arguments
///
/// * `src` - Source register, or `None` if the instruction has no such operand.
/// * `mem_op` - Instruction in the memory-stage slot, if any.
/// * `wb_op` - Instruction in the writeback-stage slot, if any.
/// * `regs` - Architectural register file.
///
/// # Returns
///
/// `Operand::Ready(0)` for `None` or `$zero`; otherwise the forwarded or architectural value,
/// or `Operand::Stall` if the memory-slot producer's value is not ready.
///
/// # Examples
///
/// ```
/// use pipesim_core::common::reg::RegisterFile;
/// use pipesim_core::core::pipeline::hazards::{resolve_operand, Operand};
/// use pipesim_core::core::pipeline::latches::PipeOp;
///
/// let mut regs = RegisterFile::new();
/// regs.write(8, 7);
///
/// // lw $t0, ... still waiting on the data cache
/// let load = PipeOp { dst: Some(8), dst_ready: false, ..PipeOp::default() };
/// assert_eq!(resolve_operand(Some(8), Some(&load), None, &regs), Operand::Stall);
/// assert_eq!(resolve_operand(Some(8), None, None, &regs), Operand::Ready(7));
/// ```
pub fn resolve_operand(
    src: Option<usize>,
    mem_op: Option<&PipeOp>,
    wb_op: Option<&PipeOp>,
    regs: &RegisterFile,
) -> Operand {
    let reg = match src {
        None | Some(0) => return Operand::Ready(0),
        Some(reg) => reg,
    };

    if let Some(op) = mem_op.filter(|op| op.dst == Some(reg)) {
        return if op.dst_ready {
            Operand::Ready(op.dst_value)
        } else {
            Operand::Stall
        };
    }

    if let Some(op) = wb_op.filter(|op| op.dst == Some(reg)) {
        return Operand::Ready(op.dst_value);
    }

    Operand::Ready(regs.read(reg))
}
