//! Pipeline control signals and operation types.
//!
//! Decode turns the raw instruction word into these signals once; later stages
//! dispatch on them rather than re-inspecting opcode bits. It defines:
//! 1. **Operation Classification:** ALU, multiply/divide and branch-condition kinds.
//! 2. **Operand Selection:** Which values feed the ALU (registers, immediate, shift amount).
//! 3. **Memory Control:** Access width and sign-extension for loads and stores.

/// Integer ALU operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Wrapping addition (ADD, ADDU, ADDI, ADDIU). Overflow does not trap.
    #[default]
    Add,
    /// Wrapping subtraction (SUB, SUBU).
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOR.
    Nor,
    /// Set less than (signed).
    Slt,
    /// Set less than unsigned.
    Sltu,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Load upper immediate: `b << 16`.
    Lui,
}

/// Where the two ALU inputs come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOperands {
    /// `a = rs`, `b = rt`.
    #[default]
    RegReg,
    /// `a = rs`, `b = immediate`.
    RegImm,
    /// `a = rt`, `b = shamt`.
    ShiftImm,
    /// `a = rt`, `b = rs` (low 5 bits used).
    ShiftReg,
}

/// Multiply/divide unit operations, including the HI/LO moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulDivOp {
    /// Signed 32×32→64 multiply.
    Mult,
    /// Unsigned 32×32→64 multiply.
    Multu,
    /// Signed divide.
    Div,
    /// Unsigned divide.
    Divu,
    /// Read HI.
    Mfhi,
    /// Read LO.
    Mflo,
    /// Write HI.
    Mthi,
    /// Write LO.
    Mtlo,
}

/// Condition under which a control-transfer instruction is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchCond {
    /// J, JAL, JR, JALR.
    Always,
    /// `rs == rt`.
    Eq,
    /// `rs != rt`.
    Ne,
    /// `rs <= 0` (signed).
    Lez,
    /// `rs > 0` (signed).
    Gtz,
    /// `rs < 0` (signed).
    Ltz,
    /// `rs >= 0` (signed).
    Gez,
}

/// How the branch destination is formed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchTarget {
    /// Fixed at decode (PC-relative branches, J, JAL).
    Static(u32),
    /// The value of `rs` (JR, JALR).
    Register,
}

/// Memory access width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemWidth {
    /// 8 bits.
    Byte,
    /// 16 bits.
    Half,
    /// 32 bits.
    Word,
}

/// Memory access control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// Access width.
    pub width: MemWidth,
    /// Loads sign-extend the loaded value.
    pub signed: bool,
    /// Store rather than load.
    pub write: bool,
}

/// Operation class decoded from the instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpClass {
    /// Unrecognised or NOP-like; flows through without effect.
    #[default]
    Nop,
    /// Integer ALU operation.
    Alu(AluOp, AluOperands),
    /// Multiply/divide unit operation.
    MulDiv(MulDivOp),
    /// Control transfer.
    Branch(BranchCond, BranchTarget),
    /// Load or store; the address is `rs + se_imm16`.
    Mem(MemAccess),
    /// SYSCALL.
    Syscall,
}
