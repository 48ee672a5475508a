//! Instruction Disassembler for the MIPS32 integer subset.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for debug tracing, logging, and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use pipesim_core::isa::disasm::disassemble;
//! let text = disassemble(0x2402_000A); // addiu $v0, $zero, 10
//! assert_eq!(text, "addiu $v0, $zero, 10");
//! ```

use crate::isa::instruction::InstructionBits;
use crate::isa::mips32::{funct, opcodes as op, regimm};

/// ABI register names for $0-$31.
const REG_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

/// Returns the ABI name for a register index.
#[inline]
fn reg(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("??")
}

/// Disassembles a 32-bit MIPS instruction into a human-readable string.
///
/// Branch offsets are printed as signed word counts relative to `pc + 4` and jump
/// targets as the 28-bit in-region byte address. Returns `"unknown"` for unrecognised
/// encodings.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
pub fn disassemble(inst: u32) -> String {
    let rs = inst.rs();
    let rt = inst.rt();
    let simm = inst.se_imm16() as i32;
    let uimm = inst.imm16();

    match inst.opcode() {
        op::OP_SPECIAL => disasm_special(inst),
        op::OP_REGIMM => {
            let mn = match rt as u32 {
                regimm::BLTZ => "bltz",
                regimm::BGEZ => "bgez",
                regimm::BLTZAL => "bltzal",
                regimm::BGEZAL => "bgezal",
                _ => return "unknown".to_string(),
            };
            format!("{mn} ${}, {simm}", reg(rs))
        }
        op::OP_J => format!("j {:#x}", inst.jump_target()),
        op::OP_JAL => format!("jal {:#x}", inst.jump_target()),

        // ── Branches ──────────────────────────────────────
        op::OP_BEQ => format!("beq ${}, ${}, {simm}", reg(rs), reg(rt)),
        op::OP_BNE => format!("bne ${}, ${}, {simm}", reg(rs), reg(rt)),
        op::OP_BLEZ => format!("blez ${}, {simm}", reg(rs)),
        op::OP_BGTZ => format!("bgtz ${}, {simm}", reg(rs)),

        // ── Immediate arithmetic ──────────────────────────
        op::OP_ADDI => format!("addi ${}, ${}, {simm}", reg(rt), reg(rs)),
        op::OP_ADDIU => format!("addiu ${}, ${}, {simm}", reg(rt), reg(rs)),
        op::OP_SLTI => format!("slti ${}, ${}, {simm}", reg(rt), reg(rs)),
        op::OP_SLTIU => format!("sltiu ${}, ${}, {simm}", reg(rt), reg(rs)),
        op::OP_ANDI => format!("andi ${}, ${}, {uimm:#x}", reg(rt), reg(rs)),
        op::OP_ORI => format!("ori ${}, ${}, {uimm:#x}", reg(rt), reg(rs)),
        op::OP_XORI => format!("xori ${}, ${}, {uimm:#x}", reg(rt), reg(rs)),
        op::OP_LUI => format!("lui ${}, {uimm:#x}", reg(rt)),

        // ── Loads / stores ────────────────────────────────
        opcode @ (op::OP_LB
        | op::OP_LH
        | op::OP_LW
        | op::OP_LBU
        | op::OP_LHU
        | op::OP_SB
        | op::OP_SH
        | op::OP_SW) => {
            let mn = match opcode {
                op::OP_LB => "lb",
                op::OP_LH => "lh",
                op::OP_LW => "lw",
                op::OP_LBU => "lbu",
                op::OP_LHU => "lhu",
                op::OP_SB => "sb",
                op::OP_SH => "sh",
                _ => "sw",
            };
            format!("{mn} ${}, {simm}(${})", reg(rt), reg(rs))
        }

        _ => "unknown".to_string(),
    }
}

/// Disassembles an `OP_SPECIAL` instruction by its function code.
fn disasm_special(inst: u32) -> String {
    let rs = inst.rs();
    let rt = inst.rt();
    let rd = inst.rd();
    let sh = inst.shamt();

    let three_reg = |mn: &str| format!("{mn} ${}, ${}, ${}", reg(rd), reg(rs), reg(rt));
    let var_shift = |mn: &str| format!("{mn} ${}, ${}, ${}", reg(rd), reg(rt), reg(rs));
    let imm_shift = |mn: &str| format!("{mn} ${}, ${}, {sh}", reg(rd), reg(rt));

    match inst.funct() {
        funct::SLL if inst == 0 => "nop".to_string(),
        funct::SLL => imm_shift("sll"),
        funct::SRL => imm_shift("srl"),
        funct::SRA => imm_shift("sra"),
        funct::SLLV => var_shift("sllv"),
        funct::SRLV => var_shift("srlv"),
        funct::SRAV => var_shift("srav"),
        funct::JR => format!("jr ${}", reg(rs)),
        funct::JALR => format!("jalr ${}, ${}", reg(rd), reg(rs)),
        funct::SYSCALL => "syscall".to_string(),
        funct::MFHI => format!("mfhi ${}", reg(rd)),
        funct::MTHI => format!("mthi ${}", reg(rs)),
        funct::MFLO => format!("mflo ${}", reg(rd)),
        funct::MTLO => format!("mtlo ${}", reg(rs)),
        funct::MULT => format!("mult ${}, ${}", reg(rs), reg(rt)),
        funct::MULTU => format!("multu ${}, ${}", reg(rs), reg(rt)),
        funct::DIV => format!("div ${}, ${}", reg(rs), reg(rt)),
        funct::DIVU => format!("divu ${}, ${}", reg(rs), reg(rt)),
        funct::ADD => three_reg("add"),
        funct::ADDU => three_reg("addu"),
        funct::SUB => three_reg("sub"),
        funct::SUBU => three_reg("subu"),
        funct::AND => three_reg("and"),
        funct::OR => three_reg("or"),
        funct::XOR => three_reg("xor"),
        funct::NOR => three_reg("nor"),
        funct::SLT => three_reg("slt"),
        funct::SLTU => three_reg("sltu"),
        _ => "unknown".to_string(),
    }
}
