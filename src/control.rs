//! Control unit: maps opcode and function fields to datapath signals

use crate::alu::ALUOp;
use crate::alu::ALUSrc;
use crate::branch::BranchKind;
use crate::instruction::OP_BRANCH;
use crate::instruction::OP_IMM;
use crate::instruction::OP_LOAD;
use crate::instruction::OP_REG;
use crate::instruction::OP_STORE;

/// funct7 with bit 5 set selects SUB/SRA/SRAI
const FUNCT7_ALT: u32 = 0b010_0000;

/// Where the next PC comes from when the branch condition holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PcSource {
    /// PC + 4
    #[default]
    Increment,
    /// PC + immediate
    BranchTarget,
}

/// Control signals.
/// The default value is a no-op: nothing is written and the PC increments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    pub alu_op: ALUOp,
    pub alu_src: ALUSrc,
    pub mem_read: bool,
    pub mem_write: bool,
    pub reg_write: bool,
    pub is_branch: bool,
    pub branch_kind: BranchKind,
    pub pc_source: PcSource,
    /// False when the encoding has no mapping
    pub supported: bool,
}

impl ControlSignals {
    /// Second ALU operand comes from the immediate
    pub fn use_immediate(&self) -> bool {
        self.alu_src == ALUSrc::IMM
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    fn alu(alu_op: ALUOp, alu_src: ALUSrc) -> Self {
        Self {
            alu_op,
            alu_src,
            reg_write: true,
            supported: true,
            ..Self::default()
        }
    }
}

/// Table-driven control decode. Total: unknown encodings map to a no-op.
pub fn decode_control(opcode: u32, funct3: u32, funct7: u32) -> ControlSignals {
    use ALUOp::*;

    match opcode {
        OP_REG => {
            let alu_op = match (funct3, funct7) {
                (0b000, 0) => ADD,
                (0b000, FUNCT7_ALT) => SUB,
                (0b001, 0) => SLL,
                (0b010, 0) => SLT,
                (0b011, 0) => SLTU,
                (0b100, 0) => XOR,
                (0b101, 0) => SRL,
                (0b101, FUNCT7_ALT) => SRA,
                (0b110, 0) => OR,
                (0b111, 0) => AND,
                _ => return ControlSignals::default(),
            };
            ControlSignals::alu(alu_op, ALUSrc::REG)
        }
        OP_IMM => {
            let alu_op = match (funct3, funct7) {
                (0b000, _) => ADD,
                (0b010, _) => SLT,
                (0b011, _) => SLTU,
                (0b100, _) => XOR,
                (0b110, _) => OR,
                (0b111, _) => AND,
                (0b001, 0) => SLL,
                (0b101, 0) => SRL,
                (0b101, FUNCT7_ALT) => SRA,
                _ => return ControlSignals::default(),
            };
            ControlSignals::alu(alu_op, ALUSrc::IMM)
        }
        OP_LOAD if funct3 == 0b010 => ControlSignals {
            mem_read: true,
            ..ControlSignals::alu(ADD, ALUSrc::IMM)
        },
        OP_STORE if funct3 == 0b010 => ControlSignals {
            alu_op: ADD,
            alu_src: ALUSrc::IMM,
            mem_write: true,
            supported: true,
            ..ControlSignals::default()
        },
        OP_BRANCH => match BranchKind::from_funct3(funct3) {
            Some(branch_kind) => ControlSignals {
                alu_op: SUB,
                alu_src: ALUSrc::REG,
                is_branch: true,
                branch_kind,
                pc_source: PcSource::BranchTarget,
                supported: true,
                ..ControlSignals::default()
            },
            None => ControlSignals::default(),
        },
        _ => ControlSignals::default(),
    }
}
