//! Single cycle implementation

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::cpu::CPUHistory;
use crate::cpu::Register;
use crate::cpu::RegisterFile;
use crate::memory::DataMemory;
use crate::memory::InstructionMemory;
use crate::snapshot::CoreSnapshot;
use crate::stages_simple::*;

/// Result of one clock cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The cycle committed; carries the new PC
    Continue(u32),
    /// A load or store touched an invalid address
    MemoryFault(u32),
    /// The PC does not name a valid instruction word
    IllegalFetch(u32),
}

/// Single-cycle rv32i core.
/// Owns the architectural state; memories are borrowed per step
#[derive(Clone, Debug, Default)]
pub struct Core {
    /// Program counter
    pc: Register,
    /// General purpose registers
    regs: RegisterFile,
    /// History of execution
    history: CPUHistory,
}

impl Core {
    /// All registers zeroed, PC at `initial_pc`
    pub fn new(initial_pc: u32) -> Self {
        Self {
            pc: Register::new(initial_pc),
            regs: RegisterFile::new(),
            history: CPUHistory::default(),
        }
    }

    pub fn read_register(&self, index: usize) -> u32 {
        self.regs.read(index)
    }

    pub fn read_pc(&self) -> u32 {
        self.pc.read()
    }

    pub fn history(&self) -> &CPUHistory {
        &self.history
    }

    pub fn snapshot(&self) -> CoreSnapshot {
        CoreSnapshot {
            pc: self.pc.read(),
            registers: self.regs.to_array(),
        }
    }

    /// Restores PC and registers; x0 stays zero whatever the snapshot holds
    pub fn restore(&mut self, snapshot: &CoreSnapshot) {
        self.pc.write(snapshot.pc);
        self.regs = RegisterFile::from_array(snapshot.registers);
    }

    /// Executes exactly one cycle.
    /// State is only committed once every stage that can fault has succeeded
    pub fn step(
        &mut self,
        imem: &impl InstructionMemory,
        dmem: &mut impl DataMemory,
    ) -> StepOutcome {
        self.history.cycle_count += 1;
        let pc = self.pc.read();

        // IF
        let raw_inst = match instruction_fetch(pc, imem) {
            Ok(raw_inst) => raw_inst,
            Err(err) => {
                warn!("illegal fetch at {:#010x}: {}", pc, err);
                return StepOutcome::IllegalFetch(pc);
            }
        };
        // ID
        let (inst, controls) = instruction_decode(raw_inst);
        trace!("{:#010x}: {:08x}  {}", pc, raw_inst, inst);
        if !controls.is_supported() {
            warn!(
                "unsupported instruction {:#010x} at {:#010x}, treated as no-op",
                raw_inst, pc
            );
        }
        let (rs1, rs2) = register_read(&inst, &self.regs);
        // EX
        let exec_result = execute(&inst, &controls, rs1, rs2);
        // MEM
        let load_value = match memory_access(&controls, &exec_result, dmem) {
            Ok(load_value) => load_value,
            Err(err) => {
                warn!("memory fault at {:#010x} (pc {:#010x}): {}", err.address(), pc, err);
                return StepOutcome::MemoryFault(err.address());
            }
        };
        // WB
        write_back(&inst, &controls, &mut self.regs, &exec_result, load_value);

        // Update PC
        let new_pc = next_pc(pc, &inst, &controls, &exec_result);
        if exec_result.branch_taken {
            debug!("branching from {:#010x} to {:#010x}", pc, new_pc);
        }
        self.pc.write(new_pc);

        self.history.inst_count += 1;
        self.history.load_count += controls.mem_read as u64;
        self.history.store_count += controls.mem_write as u64;
        self.history.branch_taken_count += exec_result.branch_taken as u64;
        self.history.unsupported_count += !controls.is_supported() as u64;

        StepOutcome::Continue(new_pc)
    }
}
