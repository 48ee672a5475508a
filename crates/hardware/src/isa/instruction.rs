//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction for the three MIPS32 formats:
//!
//! ```text
//! R: | opcode:6 | rs:5 | rt:5 | rd:5 | shamt:5 | funct:6 |
//! I: | opcode:6 | rs:5 | rt:5 |        imm:16            |
//! J: | opcode:6 |            target:26                    |
//! ```

/// Bit mask for a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for the 6-bit opcode and funct fields.
pub const SIX_BIT_MASK: u32 = 0x3F;
/// Bit mask for the 16-bit immediate.
pub const IMM16_MASK: u32 = 0xFFFF;
/// Bit mask for the 26-bit jump target index.
pub const TARGET_MASK: u32 = 0x03FF_FFFF;
/// Bits of the PC retained by J/JAL (the 256 MiB region).
pub const JUMP_REGION_MASK: u32 = 0xF000_0000;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the primary opcode (bits 31-26).
    fn opcode(&self) -> u32;

    /// Extracts the `rs` register field (bits 25-21).
    fn rs(&self) -> usize;

    /// Extracts the `rt` register field (bits 20-16).
    ///
    /// Doubles as the branch selector for REGIMM instructions.
    fn rt(&self) -> usize;

    /// Extracts the `rd` register field (bits 15-11).
    fn rd(&self) -> usize;

    /// Extracts the shift amount (bits 10-6).
    fn shamt(&self) -> u32;

    /// Extracts the SPECIAL function code (bits 5-0).
    fn funct(&self) -> u32;

    /// Extracts the raw 16-bit immediate (bits 15-0), zero-extended.
    fn imm16(&self) -> u32;

    /// Extracts the 16-bit immediate sign-extended to 32 bits.
    fn se_imm16(&self) -> u32;

    /// Extracts the J-format target already shifted to a byte offset (`target << 2`).
    fn jump_target(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        (self >> 26) & SIX_BIT_MASK
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> 21) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rt(&self) -> usize {
        ((self >> 16) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 11) & REG_MASK) as usize
    }

    #[inline(always)]
    fn shamt(&self) -> u32 {
        (self >> 6) & REG_MASK
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & SIX_BIT_MASK
    }

    #[inline(always)]
    fn imm16(&self) -> u32 {
        self & IMM16_MASK
    }

    /// Reinterprets the low half as `i16` and widens, replicating bit 15.
    #[inline(always)]
    fn se_imm16(&self) -> u32 {
        (*self as u16 as i16) as i32 as u32
    }

    #[inline(always)]
    fn jump_target(&self) -> u32 {
        (self & TARGET_MASK) << 2
    }
}
