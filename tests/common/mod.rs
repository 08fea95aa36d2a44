//! Reference encoder and a small machine harness shared by the integration tests.
#![allow(dead_code)]

use sim_lib::memory::mmu::MMU;
use sim_lib::memory::rom::InstructionRom;
use sim_lib::single_cycle::Core;
use sim_lib::single_cycle::StepOutcome;

pub const OP_LOAD: u32 = 0b0000011;
pub const OP_IMM: u32 = 0b0010011;
pub const OP_STORE: u32 = 0b0100011;
pub const OP_REG: u32 = 0b0110011;
pub const OP_BRANCH: u32 = 0b1100011;

pub fn r_type(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    (funct7 & 0x7f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

pub fn i_type(imm: i32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    ((imm as u32) & 0xfff) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

pub fn s_type(imm: i32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 5) & 0x7f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (imm & 0x1f) << 7
        | (opcode & 0x7f)
}

/// `imm` is the byte offset; bit 0 is dropped
pub fn b_type(imm: i32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 12) & 0x1) << 31
        | ((imm >> 5) & 0x3f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | ((imm >> 1) & 0xf) << 8
        | ((imm >> 11) & 0x1) << 7
        | (opcode & 0x7f)
}

pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b000, rd, OP_REG)
}

pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0x20, rs2, rs1, 0b000, rd, OP_REG)
}

pub fn slt(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b010, rd, OP_REG)
}

pub fn sltu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0b011, rd, OP_REG)
}

pub fn sra(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0x20, rs2, rs1, 0b101, rd, OP_REG)
}

pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b000, rd, OP_IMM)
}

pub fn srai(rd: u32, rs1: u32, shamt: u32) -> u32 {
    i_type((0x400 | (shamt & 0x1f)) as i32, rs1, 0b101, rd, OP_IMM)
}

pub fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0b010, rd, OP_LOAD)
}

pub fn sw(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(imm, rs2, rs1, 0b010, OP_STORE)
}

pub fn beq(rs1: u32, rs2: u32, imm: i32) -> u32 {
    b_type(imm, rs2, rs1, 0b000, OP_BRANCH)
}

pub fn bne(rs1: u32, rs2: u32, imm: i32) -> u32 {
    b_type(imm, rs2, rs1, 0b001, OP_BRANCH)
}

pub fn blt(rs1: u32, rs2: u32, imm: i32) -> u32 {
    b_type(imm, rs2, rs1, 0b100, OP_BRANCH)
}

pub fn bgeu(rs1: u32, rs2: u32, imm: i32) -> u32 {
    b_type(imm, rs2, rs1, 0b111, OP_BRANCH)
}

/// Core plus a ROM and one page of zeroed RAM at address 0
pub struct Machine {
    pub core: Core,
    pub rom: InstructionRom,
    pub ram: MMU,
}

impl Machine {
    pub fn new(base: u32, program: &[u32]) -> Self {
        let mut ram = MMU::make();
        ram.allocate_page(0);
        Self {
            core: Core::new(base),
            rom: InstructionRom::new(base, program.to_vec()),
            ram,
        }
    }

    pub fn step(&mut self) -> StepOutcome {
        self.core.step(&self.rom, &mut self.ram)
    }

    /// Steps `n` times, asserting every cycle commits
    pub fn run(&mut self, n: usize) {
        for _ in 0..n {
            let outcome = self.step();
            assert!(
                matches!(outcome, StepOutcome::Continue(_)),
                "unexpected outcome {:?}",
                outcome
            );
        }
    }

    pub fn reg(&self, index: usize) -> u32 {
        self.core.read_register(index)
    }
}
