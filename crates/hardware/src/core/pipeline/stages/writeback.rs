//! Writeback (WB) Stage.
//!
//! The final stage commits the op's result to the register file and retires it. A
//! SYSCALL whose `$v0` operand is the exit service halts the machine: fetch stops
//! producing work and the engine tears down the caches at the end of the cycle.

use crate::common::constants::HALT_SYSCALL;
use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::signals::OpClass;
use crate::isa::disasm::disassemble;

/// Executes the writeback stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline state
pub fn wb_stage(engine: &mut PipelineEngine) {
    let Some(op) = engine.wb_latch.take() else {
        return;
    };

    if let Some(dst) = op.dst {
        engine.regs.write(dst, op.dst_value);
    }

    if op.class == OpClass::Syscall && op.src1_value == HALT_SYSCALL {
        engine.pc = op.pc;
        engine.running = false;
        tracing::info!(
            pc = format_args!("{:#010x}", op.pc),
            cycle = engine.stats.cycles,
            "halt syscall retired"
        );
    }

    engine.stats.instructions_retired += 1;
    tracing::trace!(
        pc = format_args!("{:#010x}", op.pc),
        "WB {}",
        disassemble(op.inst)
    );
}
