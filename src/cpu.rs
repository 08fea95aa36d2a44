//! rv32i CPU state

/// Number of general purpose registers
pub const NUM_REGISTERS: usize = 32;

/// Default cap on simulated cycles
pub const DEFAULT_MAX_STEPS: u64 = 10_000_000;

/// Register file simulation.
/// x0 is hardwired to zero: reads return 0 and writes are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: [Register; NUM_REGISTERS],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            gpr: [Register::new(0); NUM_REGISTERS],
        }
    }

    /// Reads a register. Indexes are masked to 5 bits
    pub fn read(&self, index: usize) -> u32 {
        match index & 0x1f {
            0 => 0,
            i => self.gpr[i].read(),
        }
    }

    /// Writes to a register, ignoring x0
    pub fn write(&mut self, index: usize, value: u32) {
        match index & 0x1f {
            0 => {}
            i => self.gpr[i].write(value),
        }
    }

    /// Copies out all register values
    pub fn to_array(&self) -> [u32; NUM_REGISTERS] {
        let mut values = [0; NUM_REGISTERS];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.read(i);
        }
        values
    }

    /// Builds a register file from raw values; x0 is forced to zero
    pub fn from_array(values: [u32; NUM_REGISTERS]) -> Self {
        let mut regs = Self::new();
        for (i, value) in values.into_iter().enumerate() {
            regs.write(i, value);
        }
        regs
    }
}

/// A single 32-bit register, also used for the program counter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Register {
    /// Current data in the register
    data: u32,
}

impl Register {
    pub fn new(data: u32) -> Self {
        Self { data }
    }

    /// Reads the register
    pub fn read(&self) -> u32 {
        self.data
    }

    /// Writes to register
    pub fn write(&mut self, value: u32) {
        self.data = value;
    }
}

/// CPU policy: how the harness drives the core
#[derive(Clone, Copy, Debug)]
pub struct CPUPolicy {
    /// Stop after this many cycles
    pub max_steps: Option<u64>,
    /// Report the history module after the run
    pub history: bool,
    /// Overrides the program entry point
    pub initial_pc: Option<u32>,
}

impl Default for CPUPolicy {
    fn default() -> Self {
        Self {
            max_steps: Some(DEFAULT_MAX_STEPS),
            history: false,
            initial_pc: None,
        }
    }
}

/// History module
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CPUHistory {
    /// Cycles attempted, faulting ones included
    pub cycle_count: u64,
    /// Cycles that committed
    pub inst_count: u64,
    pub load_count: u64,
    pub store_count: u64,
    pub branch_taken_count: u64,
    pub unsupported_count: u64,
}
