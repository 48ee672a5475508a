//! MIPS32 Integer Instruction Set.
//!
//! Encodings are split the way the ISA manual splits them:
//! 1. **Opcodes:** The primary 6-bit opcode in bits 31-26.
//! 2. **Functs:** The SPECIAL (opcode 0) function codes in bits 5-0.
//! 3. **REGIMM:** The REGIMM (opcode 1) branch selectors carried in the `rt` field.

/// SPECIAL function codes.
pub mod funct;

/// Primary opcodes.
pub mod opcodes;

/// REGIMM branch selectors.
pub mod regimm;
