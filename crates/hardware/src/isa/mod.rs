//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the MIPS32 integer opcode tables, instruction field extraction, and a
//! mnemonic lookup used by trace output.
//!
//! The timing model interprets these encodings structurally (which registers an
//! instruction reads and writes, whether it is a branch or memory access); the
//! numeric encodings themselves are the standard MIPS I integer subset.

/// Mnemonic lookup for trace and diagnostic output.
pub mod disasm;

/// Instruction field extraction utilities.
pub mod instruction;

/// MIPS32 integer instruction encodings (opcodes, SPECIAL functs, REGIMM selectors).
pub mod mips32;
