//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the pipeline. It performs the following:
//! 1. **Field Extraction:** Opcode, sub-opcode, immediates and shift amount from the raw word.
//! 2. **Operand Classification:** Which registers the instruction reads and writes.
//! 3. **Control Generation:** The `OpClass` later stages dispatch on, including the
//!    static branch destination for PC-relative branches and J/JAL.
//!
//! Link instructions (JAL, JALR, BLTZAL, BGEZAL) receive their `pc + 4` result here,
//! already marked ready. Register values are not read here; execute resolves them
//! with bypassing.

use crate::common::constants::{REG_RA, REG_V0, REG_V1};
use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::PipeOp;
use crate::core::pipeline::signals::{
    AluOp, AluOperands, BranchCond, BranchTarget, MemAccess, MemWidth, MulDivOp, OpClass,
};
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::instruction::{InstructionBits, JUMP_REGION_MASK};
use crate::isa::mips32::{funct, opcodes as op, regimm};

/// Executes the instruction decode stage.
///
/// Stalls (leaves the op in place) while the execute latch is occupied.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline state
pub fn decode_stage(engine: &mut PipelineEngine) {
    if !engine.execute_latch.is_empty() {
        return;
    }
    let Some(mut pipe_op) = engine.decode_latch.take() else {
        return;
    };
    decode(&mut pipe_op);
    tracing::trace!(pc = format_args!("{:#010x}", pipe_op.pc), class = ?pipe_op.class, "ID");
    engine.execute_latch.put(pipe_op);
}

/// Fills in every decoded field of `pipe_op` from its raw instruction word.
///
/// # Arguments
///
/// * `pipe_op` - An op as produced by fetch (`pc`, `inst` and prediction set).
pub fn decode(pipe_op: &mut PipeOp) {
    let inst = pipe_op.inst;
    let (rs, rt, rd) = (inst.rs(), inst.rt(), inst.rd());
    let link = PipelineEngine::next_sequential(pipe_op.pc);

    pipe_op.opcode = inst.opcode();
    pipe_op.subop = pipe_op.opcode;
    pipe_op.imm16 = inst.imm16();
    pipe_op.se_imm16 = inst.se_imm16();
    pipe_op.shamt = inst.shamt();

    let relative = BranchTarget::Static(link.wrapping_add(pipe_op.se_imm16 << 2));

    match pipe_op.opcode {
        op::OP_SPECIAL => decode_special(pipe_op, rs, rt, rd, link),

        op::OP_REGIMM => {
            let selector = rt as u32;
            pipe_op.subop = selector;
            if matches!(
                selector,
                regimm::BLTZ | regimm::BGEZ | regimm::BLTZAL | regimm::BGEZAL
            ) {
                let cond = if selector & regimm::GEZ_BIT == 0 {
                    BranchCond::Ltz
                } else {
                    BranchCond::Gez
                };
                pipe_op.src1 = Some(rs);
                set_branch(pipe_op, cond, relative);
                if selector & regimm::LINK_BIT != 0 {
                    set_link(pipe_op, REG_RA, link);
                }
            }
        }

        op::OP_J | op::OP_JAL => {
            let dest = (pipe_op.pc & JUMP_REGION_MASK) | inst.jump_target();
            set_branch(pipe_op, BranchCond::Always, BranchTarget::Static(dest));
            if pipe_op.opcode == op::OP_JAL {
                set_link(pipe_op, REG_RA, link);
            }
        }

        op::OP_BEQ | op::OP_BNE => {
            pipe_op.src1 = Some(rs);
            pipe_op.src2 = Some(rt);
            let cond = if pipe_op.opcode == op::OP_BEQ {
                BranchCond::Eq
            } else {
                BranchCond::Ne
            };
            set_branch(pipe_op, cond, relative);
        }

        op::OP_BLEZ | op::OP_BGTZ => {
            pipe_op.src1 = Some(rs);
            let cond = if pipe_op.opcode == op::OP_BLEZ {
                BranchCond::Lez
            } else {
                BranchCond::Gtz
            };
            set_branch(pipe_op, cond, relative);
        }

        op::OP_ADDI | op::OP_ADDIU | op::OP_SLTI | op::OP_SLTIU | op::OP_ANDI | op::OP_ORI
        | op::OP_XORI | op::OP_LUI => {
            let alu = match pipe_op.opcode {
                op::OP_ADDI | op::OP_ADDIU => AluOp::Add,
                op::OP_SLTI => AluOp::Slt,
                op::OP_SLTIU => AluOp::Sltu,
                op::OP_ANDI => AluOp::And,
                op::OP_ORI => AluOp::Or,
                op::OP_XORI => AluOp::Xor,
                _ => AluOp::Lui,
            };
            if alu != AluOp::Lui {
                pipe_op.src1 = Some(rs);
            }
            pipe_op.dst = Some(rt);
            pipe_op.class = OpClass::Alu(alu, AluOperands::RegImm);
        }

        op::OP_LB | op::OP_LH | op::OP_LW | op::OP_LBU | op::OP_LHU => {
            let (width, signed) = match pipe_op.opcode {
                op::OP_LB => (MemWidth::Byte, true),
                op::OP_LBU => (MemWidth::Byte, false),
                op::OP_LH => (MemWidth::Half, true),
                op::OP_LHU => (MemWidth::Half, false),
                _ => (MemWidth::Word, false),
            };
            pipe_op.src1 = Some(rs);
            pipe_op.dst = Some(rt);
            pipe_op.class = OpClass::Mem(MemAccess {
                width,
                signed,
                write: false,
            });
        }

        op::OP_SB | op::OP_SH | op::OP_SW => {
            let width = match pipe_op.opcode {
                op::OP_SB => MemWidth::Byte,
                op::OP_SH => MemWidth::Half,
                _ => MemWidth::Word,
            };
            pipe_op.src1 = Some(rs);
            pipe_op.src2 = Some(rt);
            pipe_op.class = OpClass::Mem(MemAccess {
                width,
                signed: false,
                write: true,
            });
        }

        _ => {}
    }
}

/// Decodes an `OP_SPECIAL` instruction by its function code.
fn decode_special(pipe_op: &mut PipeOp, rs: usize, rt: usize, rd: usize, link: u32) {
    let f = pipe_op.inst.funct();
    pipe_op.subop = f;

    let alu = |kind: AluOp, operands: AluOperands| OpClass::Alu(kind, operands);
    let class = match f {
        funct::SLL => alu(AluOp::Sll, AluOperands::ShiftImm),
        funct::SRL => alu(AluOp::Srl, AluOperands::ShiftImm),
        funct::SRA => alu(AluOp::Sra, AluOperands::ShiftImm),
        funct::SLLV => alu(AluOp::Sll, AluOperands::ShiftReg),
        funct::SRLV => alu(AluOp::Srl, AluOperands::ShiftReg),
        funct::SRAV => alu(AluOp::Sra, AluOperands::ShiftReg),
        funct::ADD | funct::ADDU => alu(AluOp::Add, AluOperands::RegReg),
        funct::SUB | funct::SUBU => alu(AluOp::Sub, AluOperands::RegReg),
        funct::AND => alu(AluOp::And, AluOperands::RegReg),
        funct::OR => alu(AluOp::Or, AluOperands::RegReg),
        funct::XOR => alu(AluOp::Xor, AluOperands::RegReg),
        funct::NOR => alu(AluOp::Nor, AluOperands::RegReg),
        funct::SLT => alu(AluOp::Slt, AluOperands::RegReg),
        funct::SLTU => alu(AluOp::Sltu, AluOperands::RegReg),

        funct::MULT => OpClass::MulDiv(MulDivOp::Mult),
        funct::MULTU => OpClass::MulDiv(MulDivOp::Multu),
        funct::DIV => OpClass::MulDiv(MulDivOp::Div),
        funct::DIVU => OpClass::MulDiv(MulDivOp::Divu),
        funct::MFHI => OpClass::MulDiv(MulDivOp::Mfhi),
        funct::MFLO => OpClass::MulDiv(MulDivOp::Mflo),
        funct::MTHI => OpClass::MulDiv(MulDivOp::Mthi),
        funct::MTLO => OpClass::MulDiv(MulDivOp::Mtlo),

        funct::JR | funct::JALR => {
            pipe_op.src1 = Some(rs);
            set_branch(pipe_op, BranchCond::Always, BranchTarget::Register);
            if f == funct::JALR {
                set_link(pipe_op, rd, link);
            }
            return;
        }

        funct::SYSCALL => {
            pipe_op.src1 = Some(REG_V0);
            pipe_op.src2 = Some(REG_V1);
            pipe_op.class = OpClass::Syscall;
            return;
        }

        _ => return,
    };

    pipe_op.class = class;
    match class {
        OpClass::Alu(_, AluOperands::ShiftImm) => {
            pipe_op.src2 = Some(rt);
            pipe_op.dst = Some(rd);
        }
        OpClass::Alu(..) => {
            pipe_op.src1 = Some(rs);
            pipe_op.src2 = Some(rt);
            pipe_op.dst = Some(rd);
        }
        OpClass::MulDiv(MulDivOp::Mfhi | MulDivOp::Mflo) => pipe_op.dst = Some(rd),
        OpClass::MulDiv(MulDivOp::Mthi | MulDivOp::Mtlo) => pipe_op.src1 = Some(rs),
        _ => {
            pipe_op.src1 = Some(rs);
            pipe_op.src2 = Some(rt);
        }
    }
}

fn set_branch(pipe_op: &mut PipeOp, cond: BranchCond, target: BranchTarget) {
    pipe_op.is_branch = true;
    pipe_op.branch_cond = cond != BranchCond::Always;
    pipe_op.class = OpClass::Branch(cond, target);
}

fn set_link(pipe_op: &mut PipeOp, reg: usize, link: u32) {
    pipe_op.dst = Some(reg);
    pipe_op.dst_value = link;
    pipe_op.dst_ready = true;
}
