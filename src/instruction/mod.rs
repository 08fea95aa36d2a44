//! Instruction representation

pub mod decode_helper;
pub mod disasm;

/// NOP: ADDI x0, x0, 0
pub const NOP: u32 = 0x13;

/// Major opcodes (bits 6-0) with a control mapping
pub const OP_LOAD: u32 = 0b0000011;
pub const OP_IMM: u32 = 0b0010011;
pub const OP_STORE: u32 = 0b0100011;
pub const OP_REG: u32 = 0b0110011;
pub const OP_BRANCH: u32 = 0b1100011;

/// Decoded instruction.
/// Fields not carried by the format are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Raw representation
    pub raw_inst: u32,
    /// Format
    pub format: Format,
    pub opcode: u32,
    pub funct3: u32,
    pub funct7: u32,
    pub rs1: u32,
    pub rs2: u32,
    pub rd: u32,
    /// Sign-extended immediate
    pub imm: u32,
}

impl DecodedInstruction {
    /// Decodes a raw word. Never fails.
    pub fn new(raw_inst: u32) -> Self {
        decode_helper::parse(raw_inst)
    }

    /// Immediate as a signed value
    pub fn imm_signed(&self) -> i32 {
        self.imm as i32
    }
}

/// Decodes a raw instruction word
pub fn decode(raw_inst: u32) -> DecodedInstruction {
    DecodedInstruction::new(raw_inst)
}

/// rv32i instruction format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
    R,
    I,
    S,
    B,
    /// Opcode outside the supported subset
    #[default]
    Unknown,
}
