//! Decoding helper functions: field extraction and per-format parsing.

use super::DecodedInstruction;
use super::Format;
use super::OP_BRANCH;
use super::OP_IMM;
use super::OP_LOAD;
use super::OP_REG;
use super::OP_STORE;

/// Sign-extends the low `bits` bits of `value`
pub fn sign_extend(value: u32, bits: u32) -> u32 {
    let shamt = 32 - bits;
    ((value << shamt) as i32 >> shamt) as u32
}

/// Returns the instruction format from an opcode
pub fn opcode_to_format(opcode: u32) -> Format {
    match opcode {
        OP_REG => Format::R,
        OP_IMM | OP_LOAD => Format::I,
        OP_STORE => Format::S,
        OP_BRANCH => Format::B,
        _ => Format::Unknown,
    }
}

/// Parses a raw instruction into its fields
pub fn parse(raw_inst: u32) -> DecodedInstruction {
    let opcode = get_opcode(raw_inst);
    match opcode_to_format(opcode) {
        Format::R => parse_format_r(raw_inst),
        Format::I => parse_format_i(raw_inst),
        Format::S => parse_format_s(raw_inst),
        Format::B => parse_format_b(raw_inst),
        Format::Unknown => DecodedInstruction {
            format: Format::Unknown,
            ..parse_format_r(raw_inst)
        },
    }
}

/// Parses fields for an R-type instruction
fn parse_format_r(raw_inst: u32) -> DecodedInstruction {
    DecodedInstruction {
        raw_inst,
        format: Format::R,
        opcode: get_opcode(raw_inst),
        funct3: get_funct3(raw_inst),
        funct7: get_funct7(raw_inst),
        rs1: get_rs1(raw_inst),
        rs2: get_rs2(raw_inst),
        rd: get_rd(raw_inst),
        imm: 0,
    }
}

/// Parses fields for an I-type instruction
fn parse_format_i(raw_inst: u32) -> DecodedInstruction {
    // I*: shifts by immediate keep a funct7 in the upper bits
    fn is_i_star(opcode: u32, funct3: u32) -> bool {
        opcode == OP_IMM && (funct3 == 0b001 || funct3 == 0b101)
    }

    let opcode = get_opcode(raw_inst);
    let funct3 = get_funct3(raw_inst);
    DecodedInstruction {
        raw_inst,
        format: Format::I,
        opcode,
        funct3,
        funct7: if is_i_star(opcode, funct3) {
            get_funct7(raw_inst)
        } else {
            0
        },
        rs1: get_rs1(raw_inst),
        rs2: 0,
        rd: get_rd(raw_inst),
        imm: sign_extend(raw_inst >> 20, 12),
    }
}

/// Parses fields for an S-type instruction
fn parse_format_s(raw_inst: u32) -> DecodedInstruction {
    let imm = ((raw_inst & 0xfe00_0000) >> 20) | ((raw_inst & 0xf80) >> 7);
    DecodedInstruction {
        raw_inst,
        format: Format::S,
        opcode: get_opcode(raw_inst),
        funct3: get_funct3(raw_inst),
        funct7: 0,
        rs1: get_rs1(raw_inst),
        rs2: get_rs2(raw_inst),
        rd: 0,
        imm: sign_extend(imm, 12),
    }
}

/// Parses fields for a B-type instruction
fn parse_format_b(raw_inst: u32) -> DecodedInstruction {
    let imm = ((raw_inst & 0x8000_0000) >> 19)
        | ((raw_inst & 0x80) << 4)
        | ((raw_inst & 0x7e00_0000) >> 20)
        | ((raw_inst & 0xf00) >> 7);
    DecodedInstruction {
        raw_inst,
        format: Format::B,
        opcode: get_opcode(raw_inst),
        funct3: get_funct3(raw_inst),
        funct7: 0,
        rs1: get_rs1(raw_inst),
        rs2: get_rs2(raw_inst),
        rd: 0,
        imm: sign_extend(imm, 13),
    }
}

/// Extracts opcode from a raw instruction
pub fn get_opcode(raw_inst: u32) -> u32 {
    raw_inst & 0x7f
}

/// Extracts funct3 from a raw instruction
fn get_funct3(raw_inst: u32) -> u32 {
    (raw_inst >> 12) & 0x7
}

/// Extracts the rs1 field from a raw instruction
fn get_rs1(raw_inst: u32) -> u32 {
    (raw_inst >> 15) & 0x1f
}

/// Extracts the rs2 field from a raw instruction
fn get_rs2(raw_inst: u32) -> u32 {
    (raw_inst >> 20) & 0x1f
}

/// Extracts the rd field from a raw instruction
fn get_rd(raw_inst: u32) -> u32 {
    (raw_inst >> 7) & 0x1f
}

/// Extracts the funct7 field from a raw instruction
fn get_funct7(raw_inst: u32) -> u32 {
    (raw_inst >> 25) & 0x7f
}
