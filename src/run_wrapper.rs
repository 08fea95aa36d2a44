//! A simulator wrapper

use tracing::info;
use tracing::warn;

use crate::cpu::CPUHistory;
use crate::cpu::CPUPolicy;
use crate::error::ExecutionError;
use crate::loader::LoadedProgram;
use crate::single_cycle::Core;
use crate::single_cycle::StepOutcome;
use crate::snapshot::CoreSnapshot;

/// Why the run loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// A cycle branched to itself (`beq x0, x0, 0`)
    SelfLoop,
    /// The step limit was reached
    StepLimit(u64),
    /// The PC left the program; state is as of the start of that cycle
    IllegalFetch(u32),
    /// A load or store faulted; state is as of the start of that cycle
    MemoryFault(u32),
}

impl HaltReason {
    /// Converts abnormal stops into an error
    pub fn as_error(&self) -> Option<ExecutionError> {
        match self {
            HaltReason::SelfLoop => None,
            HaltReason::StepLimit(steps) => {
                Some(ExecutionError::ExecutionLimitReached(*steps))
            }
            HaltReason::IllegalFetch(address) => {
                Some(ExecutionError::IllegalFetch(*address))
            }
            HaltReason::MemoryFault(address) => {
                Some(ExecutionError::MemoryFault(*address))
            }
        }
    }
}

/// What a run produced
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    pub halt: HaltReason,
    pub final_pc: u32,
    pub history: CPUHistory,
    pub snapshot: CoreSnapshot,
}

/// Run simulation on a loaded program, mutating its data memory
pub fn run(program: &mut LoadedProgram, policy: CPUPolicy) -> RunSummary {
    let mut core = Core::new(policy.initial_pc.unwrap_or(program.entry));
    run_core(&mut core, program, policy)
}

/// Drives an existing core until it halts
pub fn run_core(
    core: &mut Core,
    program: &mut LoadedProgram,
    policy: CPUPolicy,
) -> RunSummary {
    info!("starting at PC {:#010x}", core.read_pc());

    let mut steps: u64 = 0;
    let halt = loop {
        if let Some(limit) = policy.max_steps {
            if steps >= limit {
                warn!("step limit of {} reached", limit);
                break HaltReason::StepLimit(limit);
            }
        }

        let pc = core.read_pc();
        steps += 1;
        match core.step(&program.rom, &mut program.data) {
            StepOutcome::Continue(new_pc) if new_pc == pc => {
                break HaltReason::SelfLoop;
            }
            StepOutcome::Continue(_) => {}
            StepOutcome::IllegalFetch(address) => {
                break HaltReason::IllegalFetch(address);
            }
            StepOutcome::MemoryFault(address) => {
                break HaltReason::MemoryFault(address);
            }
        }
    };

    let history = *core.history();
    info!("halted at PC {:#010x}: {:?}", core.read_pc(), halt);
    if policy.history {
        info!(
            "[HISTORY] cycles = {}, instructions = {}, loads = {}, stores = {}, \
             branches taken = {}, unsupported = {}",
            history.cycle_count,
            history.inst_count,
            history.load_count,
            history.store_count,
            history.branch_taken_count,
            history.unsupported_count
        );
    }

    RunSummary {
        halt,
        final_pc: core.read_pc(),
        history,
        snapshot: core.snapshot(),
    }
}
