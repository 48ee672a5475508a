//! MIPS32 REGIMM Branch Selectors.
//!
//! Carried in the `rt` field (bits 20-16) when the primary opcode is `OP_REGIMM`.
//! Bit 4 of the selector marks the linking variants.

/// Branch on Less Than Zero.
pub const BLTZ: u32 = 0x00;
/// Branch on Greater than or Equal to Zero.
pub const BGEZ: u32 = 0x01;
/// Branch on Less Than Zero and Link.
pub const BLTZAL: u32 = 0x10;
/// Branch on Greater than or Equal to Zero and Link.
pub const BGEZAL: u32 = 0x11;

/// Link-variant flag within the selector.
pub const LINK_BIT: u32 = 0x10;

/// Condition flag within the selector: set means "greater than or equal to zero".
pub const GEZ_BIT: u32 = 0x01;
