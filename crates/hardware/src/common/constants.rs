//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Memory Constants:** Word size and the byte-offset shift.
//! 2. **Instruction Constants:** Instruction size and the reset program counter.
//! 3. **Register Constants:** Indices with fixed roles in the MIPS calling convention.
//! 4. **Timing Constants:** Multiplier and divider busy latencies.

/// Size of a machine word in bytes.
pub const WORD_SIZE: u32 = 4;

/// log2 of `WORD_SIZE`; the number of byte-offset bits below a word.
pub const WORD_SHIFT: u32 = 2;

/// Mask that aligns a byte address down to its containing word.
pub const WORD_ALIGN_MASK: u32 = !(WORD_SIZE - 1);

/// Size of every instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Program counter at reset: the base of the MIPS text segment.
pub const DEFAULT_START_PC: u32 = 0x0040_0000;

/// Number of general-purpose registers.
pub const NUM_GPRS: usize = 32;

/// `$v0`, holds the syscall number.
pub const REG_V0: usize = 2;

/// `$v1`, second syscall operand.
pub const REG_V1: usize = 3;

/// `$ra`, written by the link variants of jumps and branches.
pub const REG_RA: usize = 31;

/// Syscall number that halts the machine.
pub const HALT_SYSCALL: u32 = 0xA;

/// Busy cycles after MULT/MULTU before HI/LO may be read or overwritten.
pub const MULTIPLY_LATENCY: u32 = 4;

/// Busy cycles after DIV/DIVU before HI/LO may be read or overwritten.
pub const DIVIDE_LATENCY: u32 = 32;
