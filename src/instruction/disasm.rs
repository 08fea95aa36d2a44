//! Human-readable rendering of decoded instructions, used in traces

use std::fmt;

use super::DecodedInstruction;
use super::Format;
use super::OP_IMM;
use super::OP_LOAD;
use super::OP_STORE;
use crate::branch::BranchKind;

/// Returns the mnemonic, or None outside the supported subset
pub fn mnemonic(inst: &DecodedInstruction) -> Option<&'static str> {
    let alt = inst.funct7 == 0x20;
    let name = match (inst.format, inst.opcode, inst.funct3) {
        (Format::R, _, 0b000) if alt => "sub",
        (Format::R, _, 0b101) if alt => "sra",
        (Format::R, _, _) if inst.funct7 != 0 => return None,
        (Format::R, _, 0b000) => "add",
        (Format::R, _, 0b001) => "sll",
        (Format::R, _, 0b010) => "slt",
        (Format::R, _, 0b011) => "sltu",
        (Format::R, _, 0b100) => "xor",
        (Format::R, _, 0b101) => "srl",
        (Format::R, _, 0b110) => "or",
        (Format::R, _, 0b111) => "and",
        (Format::I, OP_IMM, 0b000) => "addi",
        (Format::I, OP_IMM, 0b010) => "slti",
        (Format::I, OP_IMM, 0b011) => "sltiu",
        (Format::I, OP_IMM, 0b100) => "xori",
        (Format::I, OP_IMM, 0b110) => "ori",
        (Format::I, OP_IMM, 0b111) => "andi",
        (Format::I, OP_IMM, 0b001) if inst.funct7 == 0 => "slli",
        (Format::I, OP_IMM, 0b101) if alt => "srai",
        (Format::I, OP_IMM, 0b101) if inst.funct7 == 0 => "srli",
        (Format::I, OP_LOAD, 0b010) => "lw",
        (Format::S, OP_STORE, 0b010) => "sw",
        (Format::B, _, funct3) => match BranchKind::from_funct3(funct3)? {
            BranchKind::BEQ => "beq",
            BranchKind::BNE => "bne",
            BranchKind::BLT => "blt",
            BranchKind::BGE => "bge",
            BranchKind::BLTU => "bltu",
            BranchKind::BGEU => "bgeu",
        },
        _ => return None,
    };
    Some(name)
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(name) = mnemonic(self) else {
            return write!(f, "unknown {:#010x}", self.raw_inst);
        };
        match (self.format, self.opcode) {
            (Format::R, _) => {
                write!(f, "{} x{}, x{}, x{}", name, self.rd, self.rs1, self.rs2)
            }
            (Format::I, OP_LOAD) => {
                write!(f, "{} x{}, {}(x{})", name, self.rd, self.imm_signed(), self.rs1)
            }
            (Format::I, _) if matches!(self.funct3, 0b001 | 0b101) => {
                write!(f, "{} x{}, x{}, {}", name, self.rd, self.rs1, self.imm & 0x1f)
            }
            (Format::I, _) => {
                write!(f, "{} x{}, x{}, {}", name, self.rd, self.rs1, self.imm_signed())
            }
            (Format::S, _) => {
                write!(f, "{} x{}, {}(x{})", name, self.rs2, self.imm_signed(), self.rs1)
            }
            (Format::B, _) => {
                write!(f, "{} x{}, x{}, {}", name, self.rs1, self.rs2, self.imm_signed())
            }
            (Format::Unknown, _) => write!(f, "unknown {:#010x}", self.raw_inst),
        }
    }
}
