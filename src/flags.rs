use std::path::PathBuf;
use std::str::FromStr;

use crate::cpu::CPUPolicy;
use crate::cpu::DEFAULT_MAX_STEPS;

/// Default data RAM window
pub const DEFAULT_RAM_BASE: u32 = 0;
pub const DEFAULT_RAM_SIZE: u32 = 0x1_0000;

xflags::xflags! {
    /// RISC-V RV32I single-cycle simulator.
    cmd sim-args {
        /// Path to the program: an rv32 ELF file, or a flat binary with --raw.
        required program: PathBuf

        /// Treat the program as a flat little-endian binary of instruction words.
        optional --raw

        /// Load address (and entry point) of a --raw program. Default 0.
        optional --base base: AddressArg

        /// Overrides the entry point.
        optional --entry entry: AddressArg

        /// Start of the zeroed data RAM window. Default 0.
        optional --ram-base ram_base: AddressArg

        /// Size in bytes of the data RAM window. Default 0x10000.
        optional --ram-size ram_size: AddressArg

        /// Stop after this many cycles. Default 10000000; 0 means no limit.
        optional -n, --max-steps max_steps: u64

        /// Restore PC and registers from a JSON snapshot before running.
        optional --restore restore: PathBuf

        /// Write PC and registers as a JSON snapshot after the run.
        optional --dump-state dump_state: PathBuf

        /// Print the disassembled program and exit.
        optional -d, --disassemble

        /// Enables history module, printing cycle and instruction counts after simulation.
        optional --history

        /// Enables verbose mode, tracing every cycle.
        optional -v, --verbose
    }
}

/// A 32-bit address or size, in hex (0x prefix) or decimal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressArg(pub u32);

impl FromStr for AddressArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
            None => s.replace('_', "").parse::<u32>(),
        };
        parsed.map(AddressArg).map_err(|_| {
            format!(
                "Invalid address: '{}'. Expected a 32-bit hex (0x...) or decimal value.",
                s
            )
        })
    }
}

impl SimArgs {
    /// CPU policy described by the flags
    pub fn policy(&self) -> CPUPolicy {
        CPUPolicy {
            max_steps: match self.max_steps {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => Some(DEFAULT_MAX_STEPS),
            },
            history: self.history,
            initial_pc: self.entry.map(|entry| entry.0),
        }
    }

    pub fn base(&self) -> u32 {
        self.base.map_or(0, |base| base.0)
    }

    /// (base, size) of the data RAM window
    pub fn ram_window(&self) -> (u32, u32) {
        (
            self.ram_base.map_or(DEFAULT_RAM_BASE, |base| base.0),
            self.ram_size.map_or(DEFAULT_RAM_SIZE, |size| size.0),
        )
    }
}
