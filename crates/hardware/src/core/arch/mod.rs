//! MIPS architectural state.
//!
//! Only the integer register file is architecturally visible to this timing model;
//! HI/LO live alongside it in `common::reg::RegisterFile`.

/// General-Purpose Register file implementation.
pub mod gpr;
