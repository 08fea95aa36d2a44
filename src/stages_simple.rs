//! Primitive implementation of 5 stages

use tracing::debug;

use crate::alu::compute;
use crate::branch::evaluate;
use crate::control::decode_control;
use crate::control::ControlSignals;
use crate::control::PcSource;
use crate::cpu::RegisterFile;
use crate::error::MemoryError;
use crate::instruction::DecodedInstruction;
use crate::memory::DataMemory;
use crate::memory::InstructionMemory;

/// Transient load/store descriptor built in EX
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryAccess {
    pub address: u32,
    /// Value to store; unused by loads
    pub data: u32,
}

/// Everything EX hands to the later stages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecResult {
    pub alu_result: u32,
    pub zero: bool,
    pub branch_taken: bool,
    pub access: Option<MemoryAccess>,
}

/// IF: Fetch the instruction from memory
pub fn instruction_fetch(
    pc: u32,
    imem: &impl InstructionMemory,
) -> Result<u32, MemoryError> {
    imem.read_word(pc)
}

/// ID: Instruction decode
pub fn instruction_decode(raw_inst: u32) -> (DecodedInstruction, ControlSignals) {
    let inst = DecodedInstruction::new(raw_inst);
    let controls = decode_control(inst.opcode, inst.funct3, inst.funct7);
    (inst, controls)
}

/// ID: Register read
pub fn register_read(inst: &DecodedInstruction, regs: &RegisterFile) -> (u32, u32) {
    (regs.read(inst.rs1 as usize), regs.read(inst.rs2 as usize))
}

/// EX: Compute stuff
pub fn execute(
    inst: &DecodedInstruction,
    controls: &ControlSignals,
    op1: u32,
    op2: u32,
) -> ExecResult {
    let operand2 = if controls.use_immediate() {
        inst.imm
    } else {
        op2
    };
    let (alu_result, zero) = compute(op1, operand2, controls.alu_op);
    let branch_taken =
        controls.is_branch && evaluate(op1, op2, controls.branch_kind);

    // Loads and stores address with rs1 + imm, which is what the ALU computed
    let access = (controls.mem_read || controls.mem_write)
        .then_some(MemoryAccess {
            address: alu_result,
            data: op2,
        });

    ExecResult {
        alu_result,
        zero,
        branch_taken,
        access,
    }
}

/// MEM: Access memory.
/// Returns the loaded word for loads
pub fn memory_access(
    controls: &ControlSignals,
    exec_result: &ExecResult,
    dmem: &mut impl DataMemory,
) -> Result<Option<u32>, MemoryError> {
    let Some(access) = exec_result.access else {
        return Ok(None);
    };

    if controls.mem_write {
        dmem.write_word(access.address, access.data)?;
        debug!("store {:#010x} -> [{:#010x}]", access.data, access.address);
        Ok(None)
    } else if controls.mem_read {
        let value = dmem.read_word(access.address)?;
        debug!("load [{:#010x}] -> {:#010x}", access.address, value);
        Ok(Some(value))
    } else {
        Ok(None)
    }
}

/// WB: Write stuff back to the selected register
pub fn write_back(
    inst: &DecodedInstruction,
    controls: &ControlSignals,
    regs: &mut RegisterFile,
    exec_result: &ExecResult,
    load_value: Option<u32>,
) {
    // If you need to write
    if controls.reg_write {
        let value = match (controls.mem_read, load_value) {
            (true, Some(loaded)) => loaded,
            _ => exec_result.alu_result,
        };
        // The register file drops writes to x0
        regs.write(inst.rd as usize, value);
    }
}

/// Selects the next PC
pub fn next_pc(
    pc: u32,
    inst: &DecodedInstruction,
    controls: &ControlSignals,
    exec_result: &ExecResult,
) -> u32 {
    match controls.pc_source {
        PcSource::BranchTarget if exec_result.branch_taken => {
            pc.wrapping_add(inst.imm)
        }
        _ => pc.wrapping_add(4),
    }
}
