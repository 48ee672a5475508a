//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the in-flight instruction record and the single-entry slots
//! that carry it between the five stages: Fetch → Decode → Execute → Memory → Writeback.
//!
//! 1. **Instruction Flow:** `PipeOp` accumulates decode, execute and memory results as it moves.
//! 2. **Ownership:** A `Latch` owns at most one boxed `PipeOp`; moving an op to the next
//!    stage is a `take` followed by a `put`, and a flush drops it.
//! 3. **Back-Pressure:** An occupied latch blocks the upstream stage from writing into it.

use crate::core::pipeline::signals::OpClass;
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::bru::Prediction;

/// One instruction in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipeOp {
    /// Address the instruction was fetched from.
    pub pc: u32,
    /// Raw instruction word.
    pub inst: u32,

    /// Primary opcode.
    pub opcode: u32,
    /// Secondary selector: `funct` for SPECIAL, `rt` for REGIMM, otherwise the opcode.
    pub subop: u32,
    /// Raw 16-bit immediate.
    pub imm16: u32,
    /// Sign-extended immediate.
    pub se_imm16: u32,
    /// Shift amount.
    pub shamt: u32,
    /// Decoded operation.
    pub class: OpClass,

    /// First source register.
    pub src1: Option<usize>,
    /// Value of `src1`, resolved in execute.
    pub src1_value: u32,
    /// Second source register.
    pub src2: Option<usize>,
    /// Value of `src2`, resolved in execute.
    pub src2_value: u32,

    /// Destination register.
    pub dst: Option<usize>,
    /// Value to write to `dst`.
    pub dst_value: u32,
    /// `dst_value` is final and may be bypassed.
    pub dst_ready: bool,

    /// Effective address of a load or store.
    pub mem_addr: u32,
    /// Value a store writes (before sub-word merging).
    pub mem_value: u32,

    /// Instruction transfers control.
    pub is_branch: bool,
    /// Transfer depends on a register condition.
    pub branch_cond: bool,
    /// Resolved direction.
    pub branch_taken: bool,
    /// Resolved taken-path destination.
    pub branch_dest: u32,

    /// What fetch predicted for this PC.
    pub predicted: Prediction,
}

impl PipeOp {
    /// Creates the record fetch hands to decode.
    pub fn fetched(pc: u32, inst: u32, predicted: Prediction) -> Self {
        Self {
            pc,
            inst,
            predicted,
            ..Self::default()
        }
    }

    /// Returns `true` for loads and stores.
    pub const fn is_mem(&self) -> bool {
        matches!(self.class, OpClass::Mem(_))
    }

    /// Returns `true` for stores.
    pub const fn is_store(&self) -> bool {
        matches!(self.class, OpClass::Mem(access) if access.write)
    }
}

/// Single-entry inter-stage slot.
#[derive(Clone, Debug, Default)]
pub struct Latch {
    op: Option<Box<PipeOp>>,
}

impl Latch {
    /// Removes and returns the held op, leaving the slot empty.
    pub fn take(&mut self) -> Option<Box<PipeOp>> {
        self.op.take()
    }

    /// Places an op in the slot.
    ///
    /// Stages only write into a slot they have observed to be empty.
    pub fn put(&mut self, op: Box<PipeOp>) {
        debug_assert!(self.op.is_none(), "latch overwritten while occupied");
        self.op = Some(op);
    }

    /// Borrows the held op.
    pub fn peek(&self) -> Option<&PipeOp> {
        self.op.as_deref()
    }

    /// Mutably borrows the held op.
    pub fn peek_mut(&mut self) -> Option<&mut PipeOp> {
        self.op.as_deref_mut()
    }
}

impl PipelineLatch for Latch {
    fn flush(&mut self) {
        self.op = None;
    }

    fn is_empty(&self) -> bool {
        self.op.is_none()
    }
}
