//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. It reads
//! the word at the current PC through L1I, consults the branch predictor, and hands
//! a fresh op to decode. An L1I miss leaves the stage idle until the hierarchy
//! delivers the block; the PC does not move while waiting.

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::PipeOp;
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::bru::BranchPredictor;
use crate::core::units::cache::hierarchy::{CacheKind, LoadStatus};

/// Executes the instruction fetch stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline state
///
/// # Behavior
///
/// - After halt, only advances the PC by one instruction
/// - With the decode latch occupied, does nothing (no cache access)
/// - On an L1I miss, counts a fetch stall and produces nothing
/// - Otherwise records the prediction in a new op and moves the PC to the predicted next PC
pub fn fetch_stage(engine: &mut PipelineEngine) {
    if !engine.running {
        engine.pc = PipelineEngine::next_sequential(engine.pc);
        return;
    }

    if !engine.decode_latch.is_empty() {
        return;
    }

    let pc = engine.pc;
    let word = match engine.memory.load(pc, CacheKind::Instruction) {
        LoadStatus::Ready(word) => word,
        LoadStatus::Pending => {
            engine.stats.stalls_fetch += 1;
            return;
        }
    };

    let prediction = engine.predictor.predict(pc);
    engine.pc = prediction.next_pc;
    engine.decode_latch.put(Box::new(PipeOp::fetched(pc, word, prediction)));
    engine.stats.instructions_fetched += 1;

    tracing::trace!(
        pc = format_args!("{pc:#010x}"),
        inst = format_args!("{word:#010x}"),
        next = format_args!("{:#010x}", prediction.next_pc),
        taken = prediction.taken,
        "IF"
    );
}
