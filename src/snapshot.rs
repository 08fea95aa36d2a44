//! Architectural state snapshot: the PC followed by the 32 registers

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::cpu::NUM_REGISTERS;
use crate::error::SimulatorResult;

/// Words in the flat layout
pub const SNAPSHOT_WORDS: usize = NUM_REGISTERS + 1;

/// Persisted core state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSnapshot {
    pub pc: u32,
    pub registers: [u32; NUM_REGISTERS],
}

impl CoreSnapshot {
    /// Flat layout: `[pc, x0, x1, ..., x31]`
    pub fn to_words(&self) -> [u32; SNAPSHOT_WORDS] {
        let mut words = [0; SNAPSHOT_WORDS];
        words[0] = self.pc;
        words[1..].copy_from_slice(&self.registers);
        words
    }

    pub fn from_words(words: [u32; SNAPSHOT_WORDS]) -> Self {
        let mut registers = [0; NUM_REGISTERS];
        registers.copy_from_slice(&words[1..]);
        Self {
            pc: words[0],
            registers,
        }
    }

    /// Writes the snapshot as JSON
    pub fn save(&self, path: &Path) -> SimulatorResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a JSON snapshot
    pub fn load(path: &Path) -> SimulatorResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
